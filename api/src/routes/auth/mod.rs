//! Authentication route handlers
//!
//! Public endpoints live under `/api/v1/auth`; `logout` and `profile` sit
//! behind [`crate::middleware::JwtAuth`].

pub mod login;
pub mod logout;
pub mod password;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod verify_email;

pub use login::login;
pub use logout::logout;
pub use password::{forgot_password, reset_password};
pub use profile::profile;
pub use refresh::refresh_token;
pub use register::register;
pub use verify_email::verify_email;
