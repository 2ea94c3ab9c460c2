pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod store;

pub use self::auth::{Access, AccessPolicy};
pub use self::openapi::openapi;

use anyhow::{Context, Result, anyhow};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{MethodRouter, get, post},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;
use url::Url;
use utoipa_swagger_ui::SwaggerUi;

use self::auth::{AuthState, require_access_token};
use self::handlers::{blogs, health, login, projects, protected, refresh, root, skills};
use self::store::SharedStore;

/// Wrap `route` with the access token guard when `access` requires it.
fn with_access<S>(route: MethodRouter<S>, access: Access) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    match access {
        Access::Public => route,
        Access::Authenticated => route.route_layer(middleware::from_fn(require_access_token)),
    }
}

/// Build the application routes with their shared state.
///
/// CORS, request ids and tracing are added by [`new`]; this router is what
/// tests drive directly.
#[must_use]
pub fn router(store: SharedStore, auth_state: Arc<AuthState>, policy: AccessPolicy) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/login", post(login::login))
        .route("/refresh-token", post(refresh::refresh_token))
        .route(
            "/protected",
            with_access(get(protected::protected), policy.probe),
        )
        .route(
            "/projects",
            with_access(get(projects::list_projects), policy.reads)
                .merge(with_access(post(projects::create_project), policy.writes)),
        )
        .route(
            "/skills",
            with_access(get(skills::list_skills), policy.reads)
                .merge(with_access(post(skills::create_skill), policy.writes)),
        )
        .route(
            "/blogs",
            with_access(get(blogs::list_blogs), policy.reads)
                .merge(with_access(post(blogs::create_blog), policy.writes)),
        )
        .route("/blogs/:id", with_access(get(blogs::get_blog), policy.reads))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .layer(Extension(auth_state))
        .layer(Extension(store))
}

/// Start the server and close the store once it has shut down.
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(
    port: u16,
    store: SharedStore,
    auth_state: Arc<AuthState>,
    policy: AccessPolicy,
    frontend_origin: &str,
) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(cors_origin(frontend_origin)?))
        .allow_credentials(true);

    let app = router(store.clone(), auth_state, policy).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;

    info!("Gracefully shutdown");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

/// Reduce a configured frontend URL to the `scheme://host[:port]` origin CORS compares against.
pub(crate) fn cors_origin(frontend_origin: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_origin)
        .with_context(|| format!("Invalid frontend origin: {frontend_origin}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Frontend origin must include a valid host: {frontend_origin}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_origin_strips_path_and_trailing_slash() -> Result<()> {
        let origin = cors_origin("https://fantastic-malabi-f7d0be.netlify.app/")?;
        assert_eq!(origin, "https://fantastic-malabi-f7d0be.netlify.app");
        Ok(())
    }

    #[test]
    fn cors_origin_keeps_port() -> Result<()> {
        let origin = cors_origin("http://localhost:3000/app")?;
        assert_eq!(origin, "http://localhost:3000");
        Ok(())
    }

    #[test]
    fn cors_origin_rejects_garbage() {
        assert!(cors_origin("not a url").is_err());
    }
}
