//! HTTP handlers and the response shapes they share.

pub mod blogs;
pub mod health;
pub mod login;
pub mod projects;
pub mod protected;
pub mod refresh;
pub mod root;
pub mod skills;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::auth::IdentityClaim;
use super::store::{Collection, DocumentStore, Filter, StoreError};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a create call, shaped like a document database insert acknowledgement.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

/// Free-form JSON object submitted to a create endpoint.
#[derive(ToSchema, Deserialize, Debug)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct NewDocument(pub Map<String, Value>);

/// Optional `?category=` filter for list endpoints.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Only return documents whose `category` equals this value.
    pub category: Option<String>,
}

pub(crate) fn store_error_response(err: &StoreError) -> Response {
    error!("Store operation failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new("Internal server error")),
    )
        .into_response()
}

pub(crate) async fn list_documents(
    store: &dyn DocumentStore,
    collection: Collection,
    filter: Filter,
) -> Response {
    match store.find(collection, &filter).await {
        Ok(documents) => Json(documents).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn insert_document(
    store: &dyn DocumentStore,
    collection: Collection,
    fields: Map<String, Value>,
    claim: Option<&IdentityClaim>,
) -> Response {
    match store.insert(collection, fields).await {
        Ok(id) => {
            info!(
                collection = %collection,
                id = %id,
                by = claim.map_or("anonymous", |claim| claim.email.as_str()),
                "document created"
            );
            Json(InsertResult {
                acknowledged: true,
                inserted_id: id,
            })
            .into_response()
        }
        Err(err) => store_error_response(&err),
    }
}
