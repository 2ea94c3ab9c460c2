//! # Folio (portfolio backend)
//!
//! `folio` serves the content of a personal portfolio site (projects, skills
//! and blog posts) from a document store and guards write operations behind a
//! small token-based session layer.
//!
//! ## Sessions
//!
//! A successful `POST /login` mints two HS256 JWTs over the same identity
//! claim (`email`, `role`):
//!
//! - an **access token** (1 hour) returned in the JSON body and presented in the
//!   `Authorization` header,
//! - a **refresh token** (1 day) stored in an `HttpOnly`, `SameSite=None`
//!   cookie and exchanged at `POST /refresh-token` for a new access token.
//!
//! Tokens are validated statelessly: signature and expiry are the only checks,
//! there is no revocation list.
//!
//! ## Access policy
//!
//! Reads are public and writes require a valid access token by default. The
//! policy is applied per route when the router is built, see
//! [`folio::AccessPolicy`].

pub mod cli;
pub mod folio;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
