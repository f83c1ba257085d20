use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::MessageResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::client_address;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/verify-email/{token}
pub async fn verify_email(
    state: web::Data<AppState>,
    req: HttpRequest,
    token: web::Path<String>,
) -> HttpResponse {
    let client = client_address(&req);
    match state.session.verify_email(&token, &client).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Email address verified")),
        Err(error) => handle_domain_error(&error),
    }
}
