//! Blog posts: list, fetch one by id, create.
//!
//! Unlike projects and skills, the blog list takes no filter.

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::{
    InsertResult, MessageResponse, NewDocument, insert_document, list_documents,
    store_error_response,
};
use crate::folio::{
    auth::IdentityClaim,
    store::{Collection, Filter, SharedStore},
};

#[utoipa::path(
    get,
    path = "/blogs",
    responses(
        (status = 200, description = "All blog posts", content_type = "application/json"),
    ),
    tag = "blogs"
)]
pub async fn list_blogs(Extension(store): Extension<SharedStore>) -> Response {
    list_documents(store.as_ref(), Collection::Blogs, Filter::new()).await
}

#[utoipa::path(
    get,
    path = "/blogs/{id}",
    params(("id" = String, Path, description = "Blog post id")),
    responses(
        (status = 200, description = "The blog post", content_type = "application/json"),
        (status = 400, description = "Malformed id", body = MessageResponse),
        (status = 404, description = "No blog post with this id", body = MessageResponse),
    ),
    tag = "blogs"
)]
pub async fn get_blog(Extension(store): Extension<SharedStore>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("Invalid blog id")),
        )
            .into_response();
    };

    match store.find_by_id(Collection::Blogs, id).await {
        Ok(Some(blog)) => Json(blog).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("Blog not found")),
        )
            .into_response(),
        Err(err) => store_error_response(&err),
    }
}

#[utoipa::path(
    post,
    path = "/blogs",
    request_body = NewDocument,
    responses(
        (status = 200, description = "Blog post created", body = InsertResult),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "blogs"
)]
pub async fn create_blog(
    Extension(store): Extension<SharedStore>,
    claim: Option<Extension<IdentityClaim>>,
    Json(NewDocument(blog)): Json<NewDocument>,
) -> Response {
    insert_document(
        store.as_ref(),
        Collection::Blogs,
        blog,
        claim.as_ref().map(|Extension(claim)| claim),
    )
    .await
}
