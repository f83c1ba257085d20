//! Domain error to HTTP response mapping
//!
//! Every token failure, revoked included, renders the same 401 body so a
//! caller cannot tell a revoked token from a forged or expired one.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use sg_core::errors::{AuthError, DomainError, TokenError};
use sg_shared::{error_codes, ErrorResponse};
use validator::ValidationErrors;

const INVALID_TOKEN_MESSAGE: &str = "The token is invalid or has expired";

/// Status code a domain error maps to
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Token(TokenError::IssuanceFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
        DomainError::Auth(AuthError::CredentialInvalid) => StatusCode::UNAUTHORIZED,
        DomainError::Auth(AuthError::RateLimited { .. }) => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
        DomainError::Auth(AuthError::RegistrationDisabled) => StatusCode::FORBIDDEN,
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::debug!(error = %error, "Request rejected");
    }

    match error {
        DomainError::Token(TokenError::IssuanceFailed) => HttpResponse::InternalServerError().json(
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "Failed to issue tokens"),
        ),
        DomainError::Token(_) => HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(ErrorResponse::new(error_codes::INVALID_TOKEN, INVALID_TOKEN_MESSAGE)),
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::CredentialInvalid => HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::INVALID_CREDENTIALS,
                "Invalid email or password",
            )),
            AuthError::RateLimited {
                retry_after_seconds,
                limit,
                reset_at,
            } => HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
                .insert_header(("X-RateLimit-Limit", limit.to_string()))
                .insert_header(("X-RateLimit-Remaining", "0"))
                .insert_header(("X-RateLimit-Reset", reset_at.timestamp().to_string()))
                .json(
                    ErrorResponse::new(
                        error_codes::RATE_LIMIT_EXCEEDED,
                        format!("Too many requests. Please try again in {} seconds", retry_after_seconds),
                    )
                    .add_detail("retry_after", retry_after_seconds),
                ),
            AuthError::UserAlreadyExists => HttpResponse::Conflict().json(ErrorResponse::new(
                error_codes::USER_ALREADY_EXISTS,
                "An account with this email already exists",
            )),
            AuthError::RegistrationDisabled => HttpResponse::Forbidden().json(ErrorResponse::new(
                error_codes::REGISTRATION_DISABLED,
                "Registration is currently disabled",
            )),
        },
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone()))
        }
        DomainError::NotFound { .. } => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            "The requested resource was not found",
        )),
        DomainError::StoreUnavailable { .. } => HttpResponse::ServiceUnavailable()
            .insert_header((header::RETRY_AFTER, "1"))
            .json(ErrorResponse::new(
                error_codes::SERVICE_UNAVAILABLE,
                "The service is temporarily unavailable. Please try again later",
            )),
        DomainError::Internal { .. } => HttpResponse::InternalServerError().json(ErrorResponse::new(
            error_codes::INTERNAL_ERROR,
            "An internal error occurred",
        )),
    }
}

/// 400 response listing the offending fields
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<String> = errors.field_errors().keys().map(|field| field.to_string()).collect();
    fields.sort_unstable();

    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed").add_detail("fields", fields),
    )
}

/// Domain error carried through actix's error path, used by middleware
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        handle_domain_error(&self.0)
    }
}
