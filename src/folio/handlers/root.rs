use axum::{Json, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ServerStatus {
    message: String,
    timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is up", body = ServerStatus),
    ),
    tag = "folio"
)]
pub async fn root() -> impl IntoResponse {
    Json(ServerStatus {
        message: "Server is running smoothly".to_string(),
        timestamp: Utc::now(),
    })
}
