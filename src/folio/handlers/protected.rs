use axum::{extract::Extension, response::IntoResponse};
use tracing::debug;

use crate::folio::auth::IdentityClaim;

/// Probe for checking an access token; guarded by the access policy.
#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Token accepted", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn protected(claim: Option<Extension<IdentityClaim>>) -> impl IntoResponse {
    if let Some(Extension(claim)) = claim {
        debug!(email = %claim.email, "protected probe");
    }

    "Welcome to the protected route"
}
