use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;

pub use crate::services::auth_service::Claims;

/// Bearer-token check applied once at scope-mount time. Verifies the JWT and
/// injects Claims into request extensions for web::ReqData<Claims> extraction.
///
/// Missing/malformed Authorization header -> 401. Invalid or expired
/// signature -> 403. Scopes mounted with public_reads() let tokenless
/// GET/HEAD requests through (listing search is a public surface); a
/// presented-but-invalid token is still rejected.
pub struct AuthMiddleware {
    public_reads: bool,
}

impl AuthMiddleware {
    pub fn required() -> Self {
        AuthMiddleware {
            public_reads: false,
        }
    }

    pub fn public_reads() -> Self {
        AuthMiddleware { public_reads: true }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            public_reads: self.public_reads,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    public_reads: bool,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let is_read = req.method() == Method::GET || req.method() == Method::HEAD;

        let token = match header {
            None if self.public_reads && is_read => {
                // Anonymous read on a public surface
                let fut = self.service.call(req);
                return Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                });
            }
            None => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "success": false,
                    "error": "Missing authorization token"
                }));
                return Box::pin(
                    async move { Ok(req.into_response(response).map_into_right_body()) },
                );
            }
            Some(value) => match value.strip_prefix("Bearer ") {
                Some(token) => token.to_string(),
                None => {
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "success": false,
                        "error": "Invalid token format"
                    }));
                    return Box::pin(async move {
                        Ok(req.into_response(response).map_into_right_body())
                    });
                }
            },
        };

        match auth_service::verify_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("❌ Rejected bearer token: {}", e);
                let response = HttpResponse::Forbidden().json(serde_json::json!({
                    "success": false,
                    "error": "Invalid or expired token"
                }));
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
