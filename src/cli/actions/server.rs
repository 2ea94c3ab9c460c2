use crate::cli::commands::auth::Options;
use crate::folio::{
    self, AccessPolicy,
    auth::{AuthConfig, AuthState},
    store::{MemoryStore, PgStore, SharedStore},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

const MEMORY_DSN: &str = "memory://";

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_origin: String,
    pub auth: Options,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        dsn = %redact_dsn(&args.dsn),
        frontend_origin = %args.frontend_origin,
        production = args.auth.production,
        "Startup configuration"
    );

    let config = AuthConfig::new(args.auth.jwt_secret)
        .with_access_token_ttl_seconds(args.auth.access_token_ttl_seconds)
        .with_refresh_token_ttl_seconds(args.auth.refresh_token_ttl_seconds)
        .with_refresh_cookie_max_age_seconds(args.auth.refresh_cookie_max_age_seconds)
        .with_production(args.auth.production);
    let auth_state = AuthState::new(config).context("Failed to initialize auth state")?;

    let store = open_store(&args.dsn).await?;

    folio::new(
        args.port,
        store,
        Arc::new(auth_state),
        AccessPolicy::default(),
        &args.frontend_origin,
    )
    .await
}

async fn open_store(dsn: &str) -> Result<SharedStore> {
    if dsn == MEMORY_DSN {
        warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(dsn)
        .await
        .context("Failed to connect to database")?;
    Ok(Arc::new(store))
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_dsn_hides_password() {
        let redacted = redact_dsn("postgres://folio:s3cret@db:5432/folio");
        assert_eq!(redacted, "postgres://folio:REDACTED@db:5432/folio");
    }

    #[test]
    fn redact_dsn_without_password() {
        assert_eq!(redact_dsn("memory://"), "memory://");
        assert_eq!(redact_dsn("nonsense"), "invalid-dsn");
    }

    #[tokio::test]
    async fn memory_dsn_opens_memory_store() -> Result<()> {
        let store = open_store(MEMORY_DSN).await?;
        store.ping().await?;
        Ok(())
    }
}
