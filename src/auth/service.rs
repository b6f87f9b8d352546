use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::{
    normalize_email, AuthResponse, LoginRequest, PasswordHasher, RegisterRequest, TokenSigner,
};
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::store::UserStore;

/// Registration, login and token verification over a [`UserStore`].
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenSigner,
    passwords: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenSigner, passwords: PasswordHasher) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Creates an account and returns a token for it.
    ///
    /// Fails with `ValidationError` on malformed input and `Conflict` when the
    /// email is already registered.
    pub async fn register(&self, mut request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.name = request.name.trim().to_string();
        request.email = normalize_email(&request.email);
        request.validate()?;

        if self.users.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = self.passwords.hash(request.password).await?;
        // The store re-checks uniqueness, which covers concurrent registrations.
        let user = self
            .users
            .insert_user(User::new(request.name, request.email, password_hash))
            .await?;

        log::info!("Registered user {}", user.id);
        self.issue(&user)
    }

    /// Checks credentials and returns a fresh token.
    ///
    /// Unknown email and wrong password produce the same `Unauthorized` error.
    pub async fn login(&self, mut request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let user = match self.users.find_user_by_email(&request.email).await? {
            Some(user) => user,
            None => return Err(failed_login()),
        };
        let password_ok = self
            .passwords
            .verify(request.password, user.password_hash.clone())
            .await?;
        if !password_ok {
            return Err(failed_login());
        }

        log::info!("User {} logged in", user.id);
        self.issue(&user)
    }

    /// Returns the user id bound to a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        self.tokens.verify_token(token).map(|claims| claims.sub)
    }

    /// Verifies `token` and loads the user it was issued to.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.verify(token)?;
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))
    }

    fn issue(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.tokens.generate_token(user.id)?,
            user: UserProfile::from(user),
        })
    }
}

fn failed_login() -> AppError {
    log::warn!("Failed login attempt");
    AppError::Unauthorized("Invalid credentials".into())
}
