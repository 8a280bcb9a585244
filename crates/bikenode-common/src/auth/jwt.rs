//! Session tokens
//!
//! HMAC-signed JWTs carrying the local user id. Tokens signed with any other
//! algorithm family are rejected, and expiry is checked without leeway.

use bikenode_core::Snowflake;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AppError;

/// Default session lifetime
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Random per-login session id
    pub sid: String,
}

impl Claims {
    /// Get the user ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a Snowflake
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// A freshly issued session token
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtService {
    /// Create a service signing with `secret`
    ///
    /// # Errors
    /// Fails closed on an empty secret or a non-positive lifetime
    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("JWT secret must not be empty".to_string()));
        }
        if ttl_secs <= 0 {
            return Err(AppError::Config("JWT lifetime must be positive".to_string()));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, AppError> {
        Self::new(&config.secret, config.expiry_secs)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a token for `user_id`, valid from now for the configured lifetime
    pub fn issue(&self, user_id: Snowflake) -> Result<SessionToken, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.ttl_secs);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            sid: Uuid::new_v4().to_string(),
        };
        let token = self.sign(&claims)?;
        Ok(SessionToken { token, expires_at })
    }

    /// Sign arbitrary claims (HS256)
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// Verify signature, algorithm and expiry; returns the claims
    ///
    /// # Errors
    /// `InvalidToken` for malformed input or a non-HMAC algorithm,
    /// `InvalidSignature` for a signature made with another key,
    /// `TokenExpired` once `exp` has passed
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                ErrorKind::InvalidSignature => AppError::InvalidSignature,
                _ => AppError::InvalidToken,
            }
        })?;

        // jsonwebtoken accepts exp == now; a token is dead at its expiry instant
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AppError::TokenExpired);
        }

        Ok(data.claims)
    }

    /// Validate a session token and return the user id it was issued to
    pub fn validate(&self, token: &str) -> Result<Snowflake, AppError> {
        self.decode_token(token)?.user_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
