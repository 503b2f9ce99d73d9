//! Authentication and authorization system.
//!
//! The pieces fit together like this:
//!
//! - [`password`]: Argon2id hashing for stored credentials
//! - [`token`]: HS256 bearer token issuance and verification
//! - [`resolver`]: turns credentials or tokens into live identities
//! - [`gate`]: per-request middleware that attaches a [`Principal`]
//! - [`principal`]: the request-scoped identity and its extractor
//! - [`policy`]: the single authorize decision for every directory action
//!
//! # Authentication
//!
//! Clients log in with email and password and receive a signed, expiring
//! bearer token whose subject is their email. Every later request carries
//! `Authorization: Bearer <token>`; the gate verifies it and looks the
//! account up fresh, so deleted accounts lose access immediately even
//! with an unexpired token.
//!
//! # Authorization
//!
//! Role checks are not annotations on routes but explicit calls to
//! [`policy::authorize`] at the top of each handler, after the subject is
//! loaded and before anything mutates. The configured superadmin account
//! is a protected singleton; see [`policy`] for the exact rules.

pub mod gate;
pub mod password;
pub mod policy;
pub mod principal;
pub mod resolver;
pub mod token;

pub use principal::Principal;
