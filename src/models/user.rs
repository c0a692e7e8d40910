//! User model, JWT claims and authorization checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

use super::enums::Role;

/// User account from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Raw role column: 0=Reader, 1=Librarian, 2=Admin
    pub role: i16,
    pub library_id: Option<i32>,
    pub crea_date: Option<DateTime<Utc>>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from(self.role)
    }
}

/// Abbreviated user for embedding in other payloads
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserShort {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role(),
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: Option<Role>,
    pub library_id: Option<i32>,
}

/// JWT claims carried by every authenticated call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub library_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role >= Role::Librarian {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Librarian rights required".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role >= Role::Admin {
            Ok(())
        } else {
            Err(AppError::Authorization("Admin rights required".to_string()))
        }
    }

    /// Readers may only act on their own records; staff may act on anyone's.
    pub fn require_self_or_staff(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id || self.role >= Role::Librarian {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Cannot access another user's records".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, user_id: i32) -> UserClaims {
        UserClaims {
            sub: "test@example.org".to_string(),
            user_id,
            role,
            library_id: None,
            exp: 4_102_444_800, // 2100-01-01
            iat: 0,
        }
    }

    #[test]
    fn token_roundtrip() {
        let c = claims(Role::Librarian, 7);
        let token = c.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, Role::Librarian);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let c = claims(Role::Reader, 1);
        let token = c.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn reader_cannot_touch_other_users() {
        let c = claims(Role::Reader, 1);
        assert!(c.require_self_or_staff(1).is_ok());
        assert!(c.require_self_or_staff(2).is_err());
        assert!(c.require_staff().is_err());

        let staff = claims(Role::Librarian, 1);
        assert!(staff.require_self_or_staff(2).is_ok());
        assert!(staff.require_admin().is_err());
    }
}
