use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{
    app_state::AppState,
    auth::{Claims, JwtService},
    errors::{AppError, AppResult},
    models::domain::User,
};

/// Authenticated principal attached to a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
    pub token_expired: bool,
}

pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization header is required".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must start with Bearer".to_string())
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized("Token is required".to_string()));
    }
    Ok(token)
}

pub fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
    let token = bearer_token(headers)?;

    let (claims, token_expired) = jwt.verify(token).into_principal()?;
    if token_expired {
        log::debug!("Honoring expired token for subject {}", claims.sub);
    }
    Ok(AuthenticatedUser {
        claims,
        token_expired,
    })
}

fn state_from(req: &HttpRequest) -> AppResult<web::Data<AppState>> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()))
}

fn principal_from(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    // Set by `AuthMiddleware` when the route is wrapped, otherwise checked here.
    if let Some(principal) = req.extensions().get::<AuthenticatedUser>().cloned() {
        return Ok(principal);
    }

    let state = state_from(req)?;
    authenticate(&state.jwt_service, req.headers())
}

/// Rejects requests without a valid bearer token before they reach the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
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
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let principal = state_from(req.request())
                .and_then(|state| authenticate(&state.jwt_service, req.headers()));

            let principal = match principal {
                Ok(principal) => principal,
                Err(err) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), err);
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            req.extensions_mut().insert(principal);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(principal_from(req))
    }
}

/// A principal whose stored role is admin. The role claim inside the token
/// is not trusted; the user record is re-read on every request.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let state = state_from(req);
        let principal = principal_from(req);

        Box::pin(async move {
            let state = state?;
            let principal = principal?;
            let user = state.auth_service.require_admin(&principal.claims).await?;
            Ok(AdminUser(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header::HeaderValue, test::TestRequest};

    use crate::{config::Config, models::domain::UserRole};

    fn jwt() -> JwtService {
        JwtService::new(&Config::test_config().jwt_secret, 1, true)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        let req = TestRequest::default().to_http_request();
        match bearer_token(req.headers()) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("required")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        match bearer_token(&headers) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("Bearer")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn blank_bearer_token_is_rejected() {
        let headers = headers_with("Bearer   ");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn authenticate_marks_expired_tokens() {
        let user = User::test_user("Sam", UserRole::User);
        let expired = JwtService::new(&Config::test_config().jwt_secret, -3, true)
            .create_token(&user)
            .unwrap();

        let principal = authenticate(&jwt(), &headers_with(&format!("Bearer {}", expired))).unwrap();
        assert!(principal.token_expired);
        assert_eq!(principal.claims.sub, user.id_hex());
    }

    #[test]
    fn authenticate_rejects_garbage() {
        let result = authenticate(&jwt(), &headers_with("Bearer not.a.jwt"));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
