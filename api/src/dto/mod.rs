//! Request and response bodies

pub mod auth;

pub use auth::{
    ForgotPasswordRequest, LoginRequest, LogoutRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest,
};
