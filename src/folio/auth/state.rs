//! Auth configuration and the shared state handed to handlers.

use secrecy::SecretString;

use super::credentials::{self, CredentialError};
use super::token::TokenService;

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: u64 = 60 * 60;
const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;
const DEFAULT_REFRESH_COOKIE_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    access_token_ttl_seconds: u64,
    refresh_token_ttl_seconds: u64,
    refresh_cookie_max_age_seconds: i64,
    production: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field(
                "refresh_cookie_max_age_seconds",
                &self.refresh_cookie_max_age_seconds,
            )
            .field("production", &self.production)
            .finish()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_token_ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            refresh_cookie_max_age_seconds: DEFAULT_REFRESH_COOKIE_MAX_AGE_SECONDS,
            production: false,
        }
    }

    #[must_use]
    pub fn with_access_token_ttl_seconds(mut self, seconds: u64) -> Self {
        self.access_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_token_ttl_seconds(mut self, seconds: u64) -> Self {
        self.refresh_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_cookie_max_age_seconds(mut self, seconds: i64) -> Self {
        self.refresh_cookie_max_age_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub fn access_token_ttl_seconds(&self) -> u64 {
        self.access_token_ttl_seconds
    }

    #[must_use]
    pub fn refresh_token_ttl_seconds(&self) -> u64 {
        self.refresh_token_ttl_seconds
    }

    #[must_use]
    pub fn refresh_cookie_max_age_seconds(&self) -> i64 {
        self.refresh_cookie_max_age_seconds
    }

    /// The refresh cookie is only marked `Secure` in production.
    #[must_use]
    pub fn refresh_cookie_secure(&self) -> bool {
        self.production
    }
}

#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    tokens: TokenService,
    dummy_hash: String,
}

impl AuthState {
    /// Build the signing keys and the dummy hash used for unknown emails.
    ///
    /// # Errors
    /// Returns an error if the dummy password hash cannot be computed.
    pub fn new(config: AuthConfig) -> Result<Self, CredentialError> {
        let tokens = TokenService::new(
            &config.jwt_secret,
            config.access_token_ttl_seconds,
            config.refresh_token_ttl_seconds,
        );
        let dummy_hash = credentials::hash_password(env!("CARGO_PKG_NAME"))?;

        Ok(Self {
            config,
            tokens,
            dummy_hash,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub(crate) fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_token_lifetimes() {
        let config = AuthConfig::new(SecretString::from("s".to_string()));
        assert_eq!(config.access_token_ttl_seconds(), 3600);
        assert_eq!(config.refresh_token_ttl_seconds(), 86_400);
        assert_eq!(config.refresh_cookie_max_age_seconds(), 31_536_000);
        assert!(!config.refresh_cookie_secure());
    }

    #[test]
    fn production_marks_cookie_secure() {
        let config = AuthConfig::new(SecretString::from("s".to_string())).with_production(true);
        assert!(config.refresh_cookie_secure());
    }

    #[test]
    fn debug_masks_secret() {
        let config = AuthConfig::new(SecretString::from("top-secret".to_string()));
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
