use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::User;

/// Guards a scope: requests without a valid bearer token are answered with 401,
/// all others reach the inner service with the resolved [`User`] in the request
/// extensions (read it with [`AuthenticatedUser`](super::AuthenticatedUser)).
///
/// Requires `web::Data<AuthService>` to be registered on the app.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
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
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let token = bearer_token(req).ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;
    let auth = req
        .app_data::<web::Data<AuthService>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("AuthService is not registered".into()))?;

    auth.authenticate(token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, PasswordHasher, RegisterRequest, TokenSigner};
    use crate::store::InMemoryStore;
    use actix_web::{get, http::StatusCode, test, App, HttpResponse, Responder};
    use chrono::Duration;
    use std::sync::Arc;

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> impl Responder {
        HttpResponse::Ok().body(user.0.email)
    }

    fn auth_service() -> web::Data<AuthService> {
        web::Data::new(AuthService::new(
            Arc::new(InMemoryStore::new()),
            TokenSigner::new("middleware-test-secret", Duration::hours(1)),
            PasswordHasher::new(4),
        ))
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler_with_user() {
        let auth = auth_service();
        let registered = auth
            .register(RegisterRequest {
                name: "Alice".to_string(),
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(auth.clone())
                .service(web::scope("/api").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", registered.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "a@x.com");
    }

    #[actix_rt::test]
    async fn test_missing_or_invalid_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(auth_service())
                .service(web::scope("/api").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        let headers = [None, Some("Bearer "), Some("Bearer garbage"), Some("Basic abc")];
        for header_value in headers {
            let mut req = test::TestRequest::get().uri("/api/whoami");
            if let Some(value) = header_value {
                req = req.insert_header((header::AUTHORIZATION, value));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{:?}", header_value);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert!(body["message"].is_string());
        }
    }
}
