use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::LoginRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::middleware::client_address;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
///
/// ## Errors
/// - 401 Unauthorized: Unknown email or wrong password, indistinguishably
/// - 429 Too Many Requests: Per-address or per-account limit exceeded
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let client = client_address(&req);
    match state.session.login(&request.email, &request.password, &client).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(&error),
    }
}
