//! Request guard for routes that require an access token.
//!
//! The token is read from the `Authorization` header, either as
//! `Bearer <token>` or as the bare token. On success the decoded
//! [`IdentityClaim`](super::token::IdentityClaim) is stored in the request extensions.

use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::state::AuthState;

pub const NO_TOKEN_MESSAGE: &str = "Access Denied. No token provided.";
pub const INVALID_TOKEN_MESSAGE: &str = "Access Denied. Invalid Token.";

/// Whether a route needs a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Per-route access requirements applied when the router is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// List and get endpoints.
    pub reads: Access,
    /// Create endpoints.
    pub writes: Access,
    /// The `/protected` probe.
    pub probe: Access,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            reads: Access::Public,
            writes: Access::Authenticated,
            probe: Access::Authenticated,
        }
    }
}

impl AccessPolicy {
    #[must_use]
    pub fn with_reads(mut self, access: Access) -> Self {
        self.reads = access;
        self
    }

    #[must_use]
    pub fn with_writes(mut self, access: Access) -> Self {
        self.writes = access;
        self
    }
}

/// Middleware: reject with 401 unless a valid access token is present.
///
/// Access and refresh tokens share one payload and signing key, so a
/// still-valid refresh token is accepted here as well. Only signature and
/// expiry are checked.
pub async fn require_access_token(
    Extension(auth_state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers()) else {
        return (StatusCode::UNAUTHORIZED, NO_TOKEN_MESSAGE).into_response();
    };

    match auth_state.tokens().verify(&token) {
        Ok(claim) => {
            debug!(email = %claim.email, role = %claim.role, "access token accepted");
            request.extensions_mut().insert(claim);
            next.run(request).await
        }
        Err(err) => {
            debug!("access token rejected: {err:?}");
            (StatusCode::UNAUTHORIZED, INVALID_TOKEN_MESSAGE).into_response()
        }
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
