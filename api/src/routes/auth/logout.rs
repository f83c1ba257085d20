use actix_web::{web, HttpResponse};

use crate::dto::{LogoutRequest, MessageResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/v1/logout
///
/// Revokes the bearer access token and, when the body carries one, the
/// refresh token of the same session. Requires [`crate::middleware::JwtAuth`].
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<LogoutRequest>>,
) -> HttpResponse {
    let refresh_token = request.and_then(|body| body.into_inner().refresh_token);

    match state.session.logout(&auth.token, refresh_token.as_deref()).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Successfully logged out")),
        Err(error) => handle_domain_error(&error),
    }
}
