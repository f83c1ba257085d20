use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{ForgotPasswordRequest, MessageResponse, ResetPasswordRequest};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::middleware::client_address;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/forgot-password
///
/// Responds the same whether or not the account exists.
pub async fn forgot_password(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let client = client_address(&req);
    match state.session.initiate_password_reset(&request.email, &client).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(
            "If an account exists for this email, a reset link has been sent",
        )),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/auth/reset-password
///
/// The reset token is single use.
pub async fn reset_password(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let client = client_address(&req);
    match state
        .session
        .reset_password(&request.token, &request.new_password, &client)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Password has been reset")),
        Err(error) => handle_domain_error(&error),
    }
}
