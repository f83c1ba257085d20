use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::RefreshTokenRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::middleware::client_address;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented refresh token is
/// consumed; replaying it fails with 401.
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let client = client_address(&req);
    match state.session.refresh(&request.refresh_token, &client).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(&error),
    }
}
