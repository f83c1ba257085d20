//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserProfile};

/// Authentication response containing tokens and the user's profile
///
/// Returned by registration, login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token, single use
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,

    pub user: UserProfile,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and the user it was issued for
    pub fn from_token_pair(token_pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: token_pair.access_expires_in,
            refresh_expires_in: token_pair.refresh_expires_in,
            user: user.profile(),
        }
    }
}
