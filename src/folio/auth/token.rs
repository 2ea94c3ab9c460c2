//! Access and refresh token issuance and verification (HS256 JWT).

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Identity carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityClaim {
    pub email: String,
    pub role: String,
}

/// Signed payload: the identity claim plus the registered time claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    email: String,
    role: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, wrong algorithm or expired.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"***")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString, access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        let secret = secret.expose_secret().as_bytes();

        // Only HS256 is accepted; `alg: none` and asymmetric algorithms fail header checks.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Mint an access/refresh pair for `claim`.
    ///
    /// # Errors
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, claim: &IdentityClaim) -> Result<TokenPair, TokenError> {
        self.issue_at(claim, get_current_timestamp())
    }

    /// Same as [`issue`](Self::issue) with an explicit issue time (unix seconds).
    ///
    /// # Errors
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue_at(&self, claim: &IdentityClaim, now: u64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(claim, now, self.access_ttl_seconds)?,
            refresh_token: self.sign(claim, now, self.refresh_ttl_seconds)?,
        })
    }

    /// Exchange a refresh token for a new access token carrying the same claim.
    /// The refresh token itself is not rotated.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] if the refresh token does not verify.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claim = self.verify(refresh_token)?;
        self.sign(&claim, get_current_timestamp(), self.access_ttl_seconds)
    }

    /// Check signature and expiry and return the embedded claim.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] for every kind of verification failure.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        Ok(IdentityClaim {
            email: data.claims.email,
            role: data.claims.role,
        })
    }

    fn sign(&self, claim: &IdentityClaim, now: u64, ttl_seconds: u64) -> Result<String, TokenError> {
        let claims = TokenClaims {
            email: claim.email.clone(),
            role: claim.role.clone(),
            iat: now,
            exp: now.saturating_add(ttl_seconds),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }
}
