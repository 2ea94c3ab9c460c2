use axum::{
    extract::Extension,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::{GIT_COMMIT_HASH, folio::store::SharedStore};

const X_APP: HeaderName = HeaderName::from_static("x-app");

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    pub commit: String,
    pub name: String,
    pub version: String,
    /// `ok` when the document store answered the ping, `error` otherwise.
    pub store: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Document store is reachable", body = Health),
        (status = 503, description = "Document store is unreachable", body = Health)
    ),
    tag = "health"
)]
pub async fn health(Extension(store): Extension<SharedStore>) -> Response {
    let (status, store_state) = match store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            error!("Failed to ping document store: {err}");
            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
    };

    let body = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_state.to_string(),
    };

    let mut response = (status, Json(body)).into_response();
    match HeaderValue::from_str(&x_app_value()) {
        Ok(value) => {
            response.headers_mut().insert(X_APP, value);
        }
        Err(err) => warn!("Failed to build X-App header: {err}"),
    }
    response
}

/// `name:version:short-commit`, the commit part empty outside a git checkout.
fn x_app_value() -> String {
    let short_hash = GIT_COMMIT_HASH.get(..7).filter(|_| GIT_COMMIT_HASH != "unknown");
    format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash.unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_app_value_starts_with_package() {
        let value = x_app_value();
        assert!(value.starts_with(concat!(
            env!("CARGO_PKG_NAME"),
            ":",
            env!("CARGO_PKG_VERSION"),
            ":"
        )));
    }
}
