//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! The API is divided into two functional areas:
//!
//! - **Authentication** (`/api/v1/auth/*`): Registration and login, the only
//!   routes reachable without a bearer token
//! - **Employees** (`/api/v1/employees/*`): Profile self-service, directory
//!   lookup and listing, and the privileged delete/promote/demote operations
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
