use crate::error::AppError;
use crate::services::AdminAuthService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

const ADMIN_PREFIX: &str = "/api/admin";
const LOGIN_PATH: &str = "/api/admin/login";

/// Bearer token of an authenticated admin request, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

fn requires_admin(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || path == LOGIN_PATH {
        return false;
    }
    path == ADMIN_PREFIX || path.starts_with("/api/admin/")
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Guards `/api/admin/**` (except login) with an admin session token.
pub struct AdminAuthMiddleware {
    auth_service: AdminAuthService,
}

impl AdminAuthMiddleware {
    pub fn new(auth_service: AdminAuthService) -> Self {
        Self { auth_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddlewareService {
            service: Rc::new(service),
            auth_service: self.auth_service.clone(),
        }))
    }
}

pub struct AdminAuthMiddlewareService<S> {
    service: Rc<S>,
    auth_service: AdminAuthService,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !requires_admin(req.method(), req.path()) {
            return Box::pin(self.service.call(req));
        }

        let Some(token) = bearer_token(&req) else {
            let error = AppError::AuthError("Missing access token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        let service = Rc::clone(&self.service);
        let auth_service = self.auth_service.clone();
        Box::pin(async move {
            if !auth_service.validate_token(&token).await? {
                return Err(AppError::AuthError("Invalid or expired session".to_string()).into());
            }
            req.extensions_mut().insert(AdminToken(token));
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_paths() {
        assert!(requires_admin(&Method::GET, "/api/admin/bookings"));
        assert!(requires_admin(&Method::POST, "/api/admin/logout"));
        assert!(!requires_admin(&Method::POST, "/api/admin/login"));
        assert!(!requires_admin(&Method::OPTIONS, "/api/admin/bookings"));
        assert!(!requires_admin(&Method::GET, "/api/rooms"));
        assert!(!requires_admin(&Method::GET, "/api/administrator"));
    }
}
