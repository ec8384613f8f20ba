use super::validate_token;
use crate::error::ApiError;
use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use common::Error as DomainError;
use futures::future::{ok, LocalBoxFuture, Ready};
use std::task::{Context, Poll};

/// Requires a valid bearer token on every request it wraps and stores the
/// decoded claims in the request extensions.
pub struct AuthenticationMiddleware {
    jwt_secret: String,
}

impl AuthenticationMiddleware {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthenticationMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthenticationMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddlewareService {
            service,
            jwt_secret: self.jwt_secret.clone(),
        })
    }
}

pub struct AuthenticationMiddlewareService<S> {
    service: S,
    jwt_secret: String,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = bearer_token(&req)
            .ok_or_else(|| DomainError::Unauthenticated("Missing authorization token".to_string()))
            .and_then(|token| validate_token(&token, &self.jwt_secret));

        let claims = match claims {
            Ok(claims) => claims,
            Err(e) => {
                let response = ApiError::from(e).error_response();
                return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
            }
        };

        // Add claims to request extensions
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
