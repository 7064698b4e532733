use std::future::{Ready, ready};

use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, http::header, web::Data,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{AuthResponse, LoginInput, User, UserRole};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub login_id: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse().map_err(|_| AppError::Unauthorized)
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            log::debug!("Missing or invalid authorization header");
            return ready(Err(AppError::Unauthorized.into()));
        };

        match decode_token(token, &config.jwt_secret) {
            Ok(claims) => ready(Ok(claims)),
            Err(e) => {
                log::debug!("Rejected token: {}", e);
                ready(Err(AppError::Unauthorized.into()))
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repository
            .find_by_login_id(request.login_id.trim())
            .await
            .map_err(|e| AppError::read_failed("Failed to look up user", e))?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify(&request.password, &password_hash))
            .await
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?
            .map_err(|e| {
                log::error!("Stored password hash for {} is unusable: {}", user.login_id, e);
                AppError::Unauthorized
            })?;
        if !matches {
            log::warn!("Failed login attempt for {}", user.login_id);
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(&user)?;
        log::info!("User {} logged in", user.login_id);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<User, AppError> {
        let user_id = claims.user_id()?;
        self.user_repository
            .find_by_id(user_id)
            .await
            .map_err(|e| AppError::read_failed("Failed to look up user", e))?
            .ok_or(AppError::Unauthorized)
    }

    /// Create the configured admin account on first start; an existing account is left alone.
    pub async fn bootstrap_admin(&self, login_id: &str, password: &str) -> Result<User, AppError> {
        if let Some(user) = self
            .user_repository
            .find_by_login_id(login_id)
            .await
            .map_err(|e| AppError::read_failed("Failed to look up user", e))?
        {
            return Ok(user);
        }

        let password = password.to_string();
        let cost = self.config.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let user = self
            .user_repository
            .create_user(login_id, &password_hash, "Administrator", UserRole::Admin)
            .await
            .map_err(|e| AppError::write_failed("Failed to create admin user", e))?;
        log::info!("Created admin user {}", user.login_id);

        Ok(user)
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            login_id: user.login_id.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn claims(exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "7".to_string(),
            login_id: "dispatch".to_string(),
            role: UserRole::Staff,
            iat: now as usize,
            exp: (now + exp_offset_secs) as usize,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_a_token_signed_with_the_same_secret() {
        let token = sign(&claims(3600), "secret-a");
        let decoded = decode_token(&token, "secret-a").unwrap();
        assert_eq!(decoded.user_id().unwrap(), 7);
        assert_eq!(decoded.login_id, "dispatch");
        assert_eq!(decoded.role, UserRole::Staff);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let token = sign(&claims(3600), "secret-a");
        assert!(decode_token(&token, "secret-b").is_err());

        let expired = sign(&claims(-3 * 3600), "secret-a");
        assert!(decode_token(&expired, "secret-a").is_err());
    }
}
