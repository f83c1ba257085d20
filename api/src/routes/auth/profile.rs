use actix_web::{web, HttpResponse};

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/profile
pub async fn profile(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.session.profile(auth.user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(error) => handle_domain_error(&error),
    }
}
