use crate::{
    auth::{AuthService, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Opens an account and signs the new user in.
///
/// ## Responses:
/// - `200 OK`: `{ token, user }`.
/// - `400 Bad Request`: name shorter than 3, malformed email, password shorter than 6.
/// - `409 Conflict`: the email is already registered.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(auth.register(body.into_inner()).await?))
}

/// Exchanges credentials for a token.
///
/// ## Responses:
/// - `200 OK`: `{ token, user }`.
/// - `400 Bad Request`: malformed email or short password.
/// - `401 Unauthorized`: "Invalid credentials", whichever part was wrong.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(auth.login(body.into_inner()).await?))
}
