use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::login::TokenResponse;
use crate::folio::auth::{AuthState, TokenError, cookie::read_refresh_token};

pub const NO_REFRESH_TOKEN_MESSAGE: &str = "Access Denied. No refresh token provided.";
pub const INVALID_REFRESH_TOKEN_MESSAGE: &str = "Invalid refresh token.";

#[utoipa::path(
    post,
    path = "/refresh-token",
    responses(
        (status = 200, description = "New access token issued", body = TokenResponse),
        (status = 400, description = "Refresh token is invalid or expired"),
        (status = 401, description = "No refresh token cookie"),
    ),
    security(("refresh_cookie" = [])),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn refresh_token(
    jar: CookieJar,
    Extension(auth_state): Extension<Arc<AuthState>>,
) -> Response {
    let Some(refresh_token) = read_refresh_token(&jar) else {
        return (StatusCode::UNAUTHORIZED, NO_REFRESH_TOKEN_MESSAGE).into_response();
    };

    match auth_state.tokens().refresh(&refresh_token) {
        Ok(access_token) => Json(TokenResponse {
            success: true,
            message: "Access token is retrieved successfully.".to_string(),
            access_token,
        })
        .into_response(),
        Err(TokenError::Invalid(err)) => {
            debug!("refresh token rejected: {err}");
            (StatusCode::BAD_REQUEST, INVALID_REFRESH_TOKEN_MESSAGE).into_response()
        }
        Err(err) => {
            error!("Failed to issue access token: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
