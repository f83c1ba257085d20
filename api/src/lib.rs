//! HTTP surface for SessionGate
//!
//! Exposes registration, login, refresh, logout and the password and email
//! flows of [`sg_core::SessionService`] over actix-web.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::AppState;
