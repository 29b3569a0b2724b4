use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use time::{Duration, OffsetDateTime};

use crate::config::{AdminCredentials, Config};
use crate::error::{AppError, AppResult};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // admin email
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

pub struct AuthService;

impl AuthService {
    /// Check a login attempt against the configured admin pair
    pub fn check_admin(email: &str, password: &str, admin: &AdminCredentials) -> AppResult<()> {
        let email_ok = email.as_bytes().ct_eq(admin.email.as_bytes());
        let password_ok = password.as_bytes().ct_eq(admin.password.as_bytes());

        if bool::from(email_ok & password_ok) {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    /// Generate a JWT token for the admin
    pub fn generate_token(email: &str, config: &Config) -> AppResult<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + Duration::hours(config.jwt_expiration_hours);

        let claims = Claims {
            sub: email.to_string(),
            exp: exp.unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(token)
    }

    /// Verify and decode a JWT token. Tokens for anyone but the current
    /// admin are rejected, so rotating ADMIN_EMAIL revokes old tokens.
    pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        if token_data.claims.sub != config.admin.email {
            return Err(AppError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}
