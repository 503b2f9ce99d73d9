//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authorization checks via [`crate::auth::policy`]
//! - Business logic execution against the employee store
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration and login
//! - [`employees`]: Directory operations on employee records
//!
//! # Authentication
//!
//! Every route outside `/api/v1/auth/` requires a bearer token. The
//! [`crate::auth::gate`] middleware resolves the token to a
//! [`crate::auth::Principal`] which handlers receive as an extractor.

pub mod auth;
pub mod employees;
