use actix_web::web;

use crate::error::AppError;

/// bcrypt at a fixed work factor. Hashing runs on the blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: String) -> Result<String, AppError> {
        let cost = self.cost;
        web::block(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))?
            .map_err(AppError::from)
    }

    /// `Ok(false)` for a wrong password. A stored hash bcrypt cannot parse also
    /// counts as a mismatch, so login never turns into a server error.
    pub async fn verify(&self, password: String, stored_hash: String) -> Result<bool, AppError> {
        let outcome = web::block(move || bcrypt::verify(password, &stored_hash))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Verify task failed: {}", e)))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                log::warn!("Unreadable password hash: {}", e);
                Ok(false)
            }
        }
    }
}
