//! Domain layer containing entities and value objects.

pub mod entities;
pub mod value_objects;

pub use entities::{ClaimBody, Claims, TokenKind, TokenPair, User, UserProfile};
pub use value_objects::AuthResponse;
