pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserProfile;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenSigner};

lazy_static! {
    /// Something, an `@`, something, a dot, something. No whitespace anywhere.
    pub(crate) static ref EMAIL_REGEX: regex::Regex = regex::Regex::new(r"^\S+@\S+\.\S+$").unwrap();
}

/// Canonical form of an email address used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, at least 3 characters.
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Returned by both register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed bearer token for subsequent requests.
    pub token: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let login = |email: &str, password: &str| LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        assert!(login("a@x.com", "secret1").validate().is_ok());
        assert!(login("ax.com", "secret1").validate().is_err());
        assert!(login("a@x.com", "12345").validate().is_err());
        assert!(login("", "").validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid_register.validate().is_ok());

        let short_name_register = RegisterRequest {
            name: "Al".to_string(),
            ..valid_register.clone()
        };
        assert!(short_name_register.validate().is_err());

        let spaced_email_register = RegisterRequest {
            email: "a lice@x.com".to_string(),
            ..valid_register.clone()
        };
        assert!(spaced_email_register.validate().is_err());

        let no_dot_email_register = RegisterRequest {
            email: "alice@localhost".to_string(),
            ..valid_register.clone()
        };
        assert!(no_dot_email_register.validate().is_err());

        let short_password_register = RegisterRequest {
            password: "12345".to_string(),
            ..valid_register
        };
        assert!(short_password_register.validate().is_err());
    }

    #[test]
    fn test_validation_message_is_human_readable() {
        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "123".to_string(),
        };
        let message = request.validate().unwrap_err().to_string();
        assert!(message.contains("Password must be at least 6 characters"), "{}", message);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
