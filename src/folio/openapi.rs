use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use super::auth::cookie::REFRESH_COOKIE_NAME;
use super::handlers::{blogs, health, login, projects, protected, refresh, root, skills};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        login::login,
        refresh::refresh_token,
        protected::protected,
        projects::list_projects,
        projects::create_project,
        skills::list_skills,
        skills::create_skill,
        blogs::list_blogs,
        blogs::get_blog,
        blogs::create_blog,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "folio", description = "Server status"),
        (name = "health", description = "Dependency health"),
        (name = "auth", description = "Login and access token refresh"),
        (name = "projects", description = "Portfolio projects"),
        (name = "skills", description = "Skills"),
        (name = "blogs", description = "Blog posts"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "refresh_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(REFRESH_COOKIE_NAME))),
        );
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = openapi();
        for path in [
            "/",
            "/health",
            "/login",
            "/refresh-token",
            "/protected",
            "/projects",
            "/skills",
            "/blogs",
            "/blogs/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn declares_security_schemes() {
        let doc = openapi();
        let schemes = doc
            .components
            .map(|components| components.security_schemes)
            .unwrap_or_default();
        assert!(schemes.contains_key("bearer"));
        assert!(schemes.contains_key("refresh_cookie"));
    }
}
