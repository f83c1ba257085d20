use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::RegisterRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::middleware::client_address;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates the account, emails a verification link and signs the user in.
///
/// ## Success (201 Created)
/// Token pair plus the user's profile.
///
/// ## Errors
/// - 400 Bad Request: Invalid username, email or password
/// - 403 Forbidden: Registration disabled
/// - 409 Conflict: Email already registered
/// - 429 Too Many Requests: Rate limit exceeded
pub async fn register(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let client = client_address(&req);
    match state
        .session
        .register(&request.username, &request.email, &request.password, &client)
        .await
    {
        Ok(response) => HttpResponse::Created().json(response),
        Err(error) => handle_domain_error(&error),
    }
}
