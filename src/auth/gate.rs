//! Request authentication gate.
//!
//! Runs once per request, before routing. The gate is deliberately
//! permissive about absent credentials: anonymous requests reach the
//! handler without a principal and fail there if the route needs one. A
//! credential that is present but bad, however, stops the request here
//! with a 401 so handlers never see a half-authenticated request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument};

use crate::AppState;
use crate::auth::resolver;
use crate::errors::Result;

use super::principal::Principal;

/// Route prefixes that never carry a principal: registration and login,
/// the docs UI, and the health probe.
const PUBLIC_PREFIXES: &[&str] = &["/api/v1/auth/", "/docs", "/api-docs", "/healthz"];

fn is_public_path(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Authentication middleware applied to the whole router.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn authentication_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let bearer_token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        Some(token) => token.to_string(),
        // No usable credential: pass through, the handler decides
        None => return Ok(next.run(request).await),
    };

    let principal = resolver::resolve_from_token(state.store.as_ref(), &state.secret_key, &bearer_token).await?;

    // At most one principal per request; never replace one already attached
    if request.extensions().get::<Principal>().is_none() {
        debug!(id = principal.id, role = ?principal.role, "Principal attached");
        request.extensions_mut().insert(principal);
    }

    Ok(next.run(request).await)
}
