//! Common type definitions.
//!
//! Employee identifiers are 64-bit integers assigned by the directory
//! store (sequence-backed in Postgres, counter-backed in memory).

/// Employee record identifier.
pub type EmployeeId = i64;
