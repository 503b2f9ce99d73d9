//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs whose subject is the employee's email. There is
//! deliberately no way to read a subject out of a token without verifying
//! the signature first.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Claims carried by an issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (employee email)
    pub iat: i64,    // Issued at
    pub exp: i64,    // Expiration time
}

/// Issue a signed token for `email`, valid for `ttl`.
///
/// Returns the encoded token together with its validity window in whole
/// seconds, which login responses report as `tokenExpiresIn`.
pub fn issue_token(email: &str, secret: &str, ttl: Duration) -> Result<(String, i64), Error> {
    let now = Utc::now().timestamp();
    let expires_in = ttl.as_secs() as i64;

    let claims = Claims {
        sub: email.to_string(),
        iat: now,
        exp: now + expires_in,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    let token = encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("sign token: {e}"),
    })?;

    Ok((token, expires_in))
}

/// Verify a token's signature and expiry and return the subject email.
pub fn verify_token(token: &str, secret: &str) -> Result<String, Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        // Client errors (401) - malformed tokens, invalid claims, expired tokens
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::ExpiredSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Error::InvalidToken,

        // Server errors (500) - key issues, internal failures
        jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
        | jsonwebtoken::errors::ErrorKind::RsaFailedSigning
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName
        | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
        | jsonwebtoken::errors::ErrorKind::MissingAlgorithm
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::Crypto(_) => Error::Internal {
            operation: format!("verify token: {e}"),
        },

        // Catch-all for any future error variants (default to server error for safety)
        _ => Error::Internal {
            operation: format!("verify token (unknown error): {e}"),
        },
    })?;

    Ok(token_data.claims.sub)
}
