#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    test,
};
use serde_json::json;
use taskboard::{auth::AuthResponse, config::Config, store::InMemoryStore, AppServices};

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("JWT_SECRET", "integration-test-secret"),
        ("BCRYPT_COST", "4"),
        ("JWT_EXPIRATION_HOURS", "1"),
    ]
    .into_iter()
    .collect();
    Config::from_lookup(|key| vars.get(key).map(|value| value.to_string()))
        .expect("test config is valid")
}

/// Fresh services over an empty in-memory store.
pub fn in_memory_services() -> AppServices {
    let store = Arc::new(InMemoryStore::new());
    AppServices::new(store.clone(), store, &test_config())
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers a user through the API and returns the token and profile.
pub async fn register_user<S, B>(app: &S, name: &str, email: &str, password: &str) -> AuthResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(
        resp.status().is_success(),
        "registering {} failed with {}",
        email,
        resp.status()
    );
    test::read_body_json(resp).await
}
