//! Services implementing the token lifecycle.
//!
//! Dependency order, leaves first: `store`, `token`, `revocation`,
//! `rate_guard`, `session`.

pub mod rate_guard;
pub mod revocation;
pub mod session;
pub mod store;
pub mod token;

pub use rate_guard::{RateDecision, RateGuard, RateScope};
pub use revocation::RevocationStore;
pub use session::{CredentialHasher, EmailService, SessionConfig, SessionService};
pub use store::{KeyValueStore, MemoryStore, StoreError, WindowCount};
pub use token::{strip_bearer, Signer, TokenIssuer, TokenServiceConfig, TokenValidator};
