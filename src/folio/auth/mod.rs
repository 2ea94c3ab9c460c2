//! Authentication: credential checks, token issuance, refresh cookie and guard.

pub mod cookie;
pub mod credentials;
pub mod guard;
pub mod state;
pub mod token;

pub use self::credentials::{Account, CredentialError, hash_password};
pub use self::guard::{Access, AccessPolicy, require_access_token};
pub use self::state::{AuthConfig, AuthState};
pub use self::token::{IdentityClaim, TokenError, TokenPair, TokenService};
