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
    path = "/skills",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Skills, optionally filtered by category", content_type = "application/json"),
    ),
    tag = "skills"
)]
pub async fn list_skills(
    Extension(store): Extension<SharedStore>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let filter = Filter::new().eq_opt("category", query.category);
    list_documents(store.as_ref(), Collection::Skills, filter).await
}

#[utoipa::path(
    post,
    path = "/skills",
    request_body = NewDocument,
    responses(
        (status = 200, description = "Skill created", body = InsertResult),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "skills"
)]
pub async fn create_skill(
    Extension(store): Extension<SharedStore>,
    claim: Option<Extension<IdentityClaim>>,
    Json(NewDocument(skill)): Json<NewDocument>,
) -> Response {
    insert_document(
        store.as_ref(),
        Collection::Skills,
        skill,
        claim.as_ref().map(|Extension(claim)| claim),
    )
    .await
}
