//! Bearer authentication for protected routes.
//!
//! The middleware validates the access token through the session facade, so
//! signature, expiry, kind and revocation are all checked, and injects an
//! [`AuthContext`] into the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sg_core::errors::{DomainError, TokenError};
use sg_core::Claims;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::handlers::{handle_domain_error, ApiError};
use crate::state::AppState;

/// Authenticated caller, available to handlers behind [`JwtAuth`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    /// Unique id of the access token
    pub jti: String,
    /// The raw access token, needed to revoke it on logout
    pub token: String,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims, token: String) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username().map(str::to_string),
            email: claims.email().map(str::to_string),
            jti: claims.jti.clone(),
            token,
        }
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req) else {
                return Ok(reject(req, &DomainError::Token(TokenError::Malformed)));
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let error = DomainError::Internal {
                    message: "Application state is not configured".to_string(),
                };
                return Ok(reject(req, &error));
            };

            match state.session.validate(&token).await {
                Ok(claims) => {
                    req.extensions_mut().insert(AuthContext::from_claims(&claims, token));
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                Err(error) => Ok(reject(req, &error)),
            }
        })
    }
}

/// Answers the request with the mapped error response
fn reject<B>(req: ServiceRequest, error: &DomainError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(handle_domain_error(error)).map_into_right_body()
}

/// Extracts the Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Caller address for rate limiting, honouring proxy headers
pub fn client_address(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(DomainError::Token(TokenError::Malformed)).into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;

    #[test]
    fn test_extract_bearer_token() {
        let req = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = actix_test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer   "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = actix_test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }

    #[test]
    fn test_client_address() {
        let req = actix_test::TestRequest::default()
            .peer_addr("198.51.100.7:52000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_address(&req), "198.51.100.7");

        let forwarded = actix_test::TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.5"))
            .to_http_request();
        assert_eq!(client_address(&forwarded), "203.0.113.5");

        let unknown = actix_test::TestRequest::default().to_http_request();
        assert_eq!(client_address(&unknown), "unknown");
    }
}
