//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{ClaimBody, Claims, TokenKind, TokenPair};
pub use user::{normalize_email, User, UserProfile};
