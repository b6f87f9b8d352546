use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::auth::normalize_email;
use crate::error::AppError;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::store::UserStore;

/// Profile reads and edits for the authenticated user.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .map(|user| UserProfile::from(&user))
            .ok_or_else(user_not_found)
    }

    /// Updates name and/or email. A new email must not belong to another user.
    /// Blank fields keep their current value.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let request = UpdateProfileRequest {
            name: request
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            email: request
                .email
                .as_deref()
                .map(normalize_email)
                .filter(|email| !email.is_empty()),
        };
        request.validate()?;

        let user = self
            .store
            .update_user_profile(user_id, request.name, request.email)
            .await?
            .ok_or_else(user_not_found)?;
        log::info!("User {} updated their profile", user.id);
        Ok(UserProfile::from(&user))
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::InMemoryStore;

    async fn setup() -> (UserService, User, User) {
        let store = Arc::new(InMemoryStore::new());
        let alice = store
            .insert_user(User::new("Alice".into(), "a@x.com".into(), "hash".into()))
            .await
            .unwrap();
        let bob = store
            .insert_user(User::new("Bob".into(), "b@x.com".into(), "hash".into()))
            .await
            .unwrap();
        (UserService::new(store), alice, bob)
    }

    #[actix_rt::test]
    async fn test_update_name_keeps_email() {
        let (users, alice, _) = setup().await;
        let request = UpdateProfileRequest {
            name: Some("Alicia".to_string()),
            email: None,
        };

        let profile = users.update_profile(alice.id, request).await.unwrap();
        assert_eq!(profile.name, "Alicia");
        assert_eq!(profile.email, "a@x.com");
        assert_eq!(users.profile(alice.id).await.unwrap(), profile);
    }

    #[actix_rt::test]
    async fn test_update_email_is_normalized() {
        let (users, alice, _) = setup().await;
        let request = UpdateProfileRequest {
            name: None,
            email: Some(" Alice@Example.com".to_string()),
        };

        let profile = users.update_profile(alice.id, request).await.unwrap();
        assert_eq!(profile.email, "alice@example.com");
    }

    #[actix_rt::test]
    async fn test_update_email_taken_by_other_user() {
        let (users, alice, bob) = setup().await;
        let request = UpdateProfileRequest {
            name: None,
            email: Some(bob.email.to_uppercase()),
        };

        assert!(matches!(
            users.update_profile(alice.id, request).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[actix_rt::test]
    async fn test_update_rejects_invalid_fields() {
        let (users, alice, _) = setup().await;
        let request = UpdateProfileRequest {
            name: Some(" x ".to_string()),
            email: None,
        };

        assert!(matches!(
            users.update_profile(alice.id, request).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_rt::test]
    async fn test_blank_fields_keep_current_values() {
        let (users, alice, _) = setup().await;
        let request = UpdateProfileRequest {
            name: Some("Alicia".to_string()),
            email: Some("  ".to_string()),
        };

        let updated = users.update_profile(alice.id, request).await.unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "a@x.com");

        let request = UpdateProfileRequest {
            name: Some(String::new()),
            email: None,
        };
        let unchanged = users.update_profile(alice.id, request).await.unwrap();
        assert_eq!(unchanged.name, "Alicia");
    }

    #[actix_rt::test]
    async fn test_unknown_user_is_not_found() {
        let (users, _, _) = setup().await;
        let request = UpdateProfileRequest {
            name: Some("Ghost".to_string()),
            email: None,
        };

        assert!(matches!(
            users.update_profile(Uuid::new_v4(), request).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            users.profile(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
