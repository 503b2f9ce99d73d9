//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract.
//!
//! # Design Principles
//!
//! - **Separation of Concerns**: API models are distinct from store models, so
//!   the wire format can evolve independently of the storage representation
//! - **Validation**: Request bodies are validated with `validator` before any
//!   work happens, producing the field-level error map described in [`crate::errors`]
//! - **OpenAPI**: All models are annotated with `utoipa` for automatic API docs
//!
//! Responses never include the password hash. [`employees::EmployeeResponse`]
//! is the only shape an employee record is ever rendered through.

pub mod auth;
pub mod employees;
