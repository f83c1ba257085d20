//! Request middleware and extractors

pub mod auth;

pub use auth::{client_address, AuthContext, JwtAuth};
