//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use loan_shared::constants::TOKEN_TYPE_ACCESS;
use loan_shared::Role;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::session::Session;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Unexpected token type: {0}")]
    WrongTokenType(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Actor (user account) id
    pub sub: String,
    /// Session id, checked against the session store on every request
    pub sid: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

impl Claims {
    pub fn actor_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::ValidationError(e.to_string()))
    }

    pub fn session_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sid).map_err(|e| JwtError::ValidationError(e.to_string()))
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry: access_expiry,
        }
    }

    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Issue the bearer token for an already-registered session
    pub fn generate_access_token(&self, session: &Session) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: session.actor_id.to_string(),
            sid: session.id.to_string(),
            role: session.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })?;

        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(JwtError::WrongTokenType(claims.token_type));
        }
        Ok(claims)
    }
}
