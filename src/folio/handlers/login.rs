use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::{MessageResponse, store_error_response};
use crate::folio::{
    auth::{AuthState, CredentialError, cookie::refresh_cookie, credentials},
    store::SharedStore,
};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Login body. Absent or non-string fields read as empty and fail the
/// credential check like any other unknown pair.
#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    password: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => value,
        _ => String::new(),
    })
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by login and token refresh.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub message: String,
    pub access_token: String,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, refresh token set as cookie", body = TokenResponse),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Invalid email or password", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    jar: CookieJar,
    Extension(auth_state): Extension<Arc<AuthState>>,
    Extension(store): Extension<SharedStore>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let account = match credentials::verify(
        store.as_ref(),
        &request.email,
        &request.password,
        auth_state.dummy_hash(),
    )
    .await
    {
        Ok(account) => account,
        Err(CredentialError::NotFound) => {
            info!(email = %request.email, "Login rejected");
            return (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse::new(INVALID_CREDENTIALS_MESSAGE)),
            )
                .into_response();
        }
        Err(CredentialError::Store(err)) => return store_error_response(&err),
        Err(err) => {
            error!("Credential verification failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let pair = match auth_state.tokens().issue(&account.claim()) {
        Ok(pair) => pair,
        Err(err) => {
            error!("Failed to issue tokens: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    info!(email = %account.email, role = %account.role, "Login successful");

    let jar = jar.add(refresh_cookie(auth_state.config(), pair.refresh_token));
    let body = TokenResponse {
        success: true,
        message: "Login successful".to_string(),
        access_token: pair.access_token,
    };

    (jar, Json(body)).into_response()
}
