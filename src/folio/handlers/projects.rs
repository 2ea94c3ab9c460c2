use axum::{
    Json,
    extract::{Extension, Query},
    response::Response,
};

use super::{CategoryQuery, InsertResult, NewDocument, insert_document, list_documents};
use crate::folio::{
    auth::IdentityClaim,
    store::{Collection, Filter, SharedStore},
};

#[utoipa::path(
    get,
    path = "/projects",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Projects, optionally filtered by category", content_type = "application/json"),
    ),
    tag = "projects"
)]
pub async fn list_projects(
    Extension(store): Extension<SharedStore>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let filter = Filter::new().eq_opt("category", query.category);
    list_documents(store.as_ref(), Collection::Projects, filter).await
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = NewDocument,
    responses(
        (status = 200, description = "Project created", body = InsertResult),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn create_project(
    Extension(store): Extension<SharedStore>,
    claim: Option<Extension<IdentityClaim>>,
    Json(NewDocument(project)): Json<NewDocument>,
) -> Response {
    insert_document(
        store.as_ref(),
        Collection::Projects,
        project,
        claim.as_ref().map(|Extension(claim)| claim),
    )
    .await
}
