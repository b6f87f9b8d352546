use crate::{
    auth::AuthenticatedUser, error::AppError, models::UpdateProfileRequest, users::UserService,
};
use actix_web::{get, put, web, HttpResponse, Responder};

/// Returns the authenticated user's profile.
#[get("/profile")]
pub async fn get_profile(
    users: web::Data<UserService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = users.profile(user.id()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Updates the authenticated user's name and/or email.
///
/// ## Responses:
/// - `200 OK`: the updated profile.
/// - `400 Bad Request`: a present field fails validation.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: the account no longer exists.
/// - `409 Conflict`: the email belongs to another account.
#[put("/profile")]
pub async fn update_profile(
    users: web::Data<UserService>,
    user: AuthenticatedUser,
    profile_data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    let profile = users
        .update_profile(user.id(), profile_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
