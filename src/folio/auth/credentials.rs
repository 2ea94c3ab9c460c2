//! Credential verification against account records in the store.
//!
//! Accounts live in the `users` collection as `{email, password, role}` where
//! `password` is an Argon2 PHC string. Unknown emails and wrong passwords are
//! reported the same way.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::token::IdentityClaim;
use crate::folio::store::{Collection, DocumentStore, Filter, StoreError};

#[derive(Debug, Error)]
pub enum CredentialError {
    /// No account matches the email/password pair.
    #[error("invalid email or password")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("password verification task failed")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Clone, Deserialize)]
pub struct Account {
    pub email: String,
    #[serde(rename = "password")]
    password_hash: String,
    pub role: String,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("email", &self.email)
            .field("password_hash", &"***")
            .field("role", &self.role)
            .finish()
    }
}

impl Account {
    #[must_use]
    pub fn claim(&self) -> IdentityClaim {
        IdentityClaim {
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// Hash a password into an Argon2id PHC string.
///
/// # Errors
/// Returns [`CredentialError::Hash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialError::Hash(err.to_string()))
}

fn password_matches(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            warn!("Stored password is not a valid PHC string: {err}");
            false
        }
    }
}

/// Look up the account for `email` and check `password` against it.
///
/// `dummy_hash` is verified when the email is unknown so both failure paths
/// cost one hash verification.
///
/// # Errors
/// Returns [`CredentialError::NotFound`] on any mismatch, or a store/task error.
pub async fn verify(
    store: &dyn DocumentStore,
    email: &str,
    password: &str,
    dummy_hash: &str,
) -> Result<Account, CredentialError> {
    let record = store
        .find_one(Collection::Users, &Filter::new().eq("email", email))
        .await?;

    let account = match record {
        Some(doc) => Some(
            serde_json::from_value::<Account>(Value::Object(doc.fields)).map_err(|err| {
                StoreError::InvalidDocument(format!("account {}: {err}", doc.id))
            })?,
        ),
        None => None,
    };

    let phc = account
        .as_ref()
        .map_or_else(|| dummy_hash.to_string(), |account| account.password_hash.clone());
    let password = password.to_string();
    let matches = tokio::task::spawn_blocking(move || password_matches(&password, &phc)).await?;

    match account {
        Some(account) if matches => Ok(account),
        _ => {
            debug!("credential check failed");
            Err(CredentialError::NotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::folio::store::MemoryStore;
    use serde_json::{Map, json};

    async fn store_with(email: &str, password: &str, role: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let Value::Object(fields) = json!({
            "email": email,
            "password": hash_password(password).unwrap(),
            "role": role,
        }) else {
            unreachable!()
        };
        store.insert(Collection::Users, fields).await.unwrap();
        store
    }

    #[test]
    fn hash_and_verify() {
        let phc = hash_password("hunter2").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(password_matches("hunter2", &phc));
        assert!(!password_matches("hunter3", &phc));
    }

    #[test]
    fn plaintext_stored_password_never_matches() {
        assert!(!password_matches("hunter2", "hunter2"));
    }

    #[tokio::test]
    async fn verify_returns_account() {
        let store = store_with("owner@folio.dev", "pw", "admin").await;
        let dummy = hash_password("dummy").unwrap();

        let account = verify(&store, "owner@folio.dev", "pw", &dummy).await.unwrap();
        assert_eq!(
            account.claim(),
            IdentityClaim {
                email: "owner@folio.dev".to_string(),
                role: "admin".to_string()
            }
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let store = store_with("owner@folio.dev", "pw", "admin").await;
        let dummy = hash_password("dummy").unwrap();

        let wrong = verify(&store, "owner@folio.dev", "nope", &dummy).await;
        let unknown = verify(&store, "nobody@folio.dev", "pw", &dummy).await;
        assert!(matches!(wrong, Err(CredentialError::NotFound)));
        assert!(matches!(unknown, Err(CredentialError::NotFound)));
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let store = store_with("owner@folio.dev", "pw", "admin").await;
        let dummy = hash_password("dummy").unwrap();

        let result = verify(&store, "Owner@folio.dev", "pw", &dummy).await;
        assert!(matches!(result, Err(CredentialError::NotFound)));
    }

    #[tokio::test]
    async fn malformed_account_is_a_store_error() {
        let store = MemoryStore::new();
        let mut fields = Map::new();
        fields.insert("email".to_string(), json!("owner@folio.dev"));
        store.insert(Collection::Users, fields).await.unwrap();
        let dummy = hash_password("dummy").unwrap();

        let result = verify(&store, "owner@folio.dev", "pw", &dummy).await;
        assert!(matches!(result, Err(CredentialError::Store(_))));
    }

    #[test]
    fn debug_masks_hash() {
        let account = Account {
            email: "a@b.c".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: "admin".to_string(),
        };
        assert!(!format!("{account:?}").contains("secret"));
    }
}
