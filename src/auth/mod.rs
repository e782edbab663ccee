use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Token payload issued by the login service. Only `id` is consumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Any JSON value; `caller_id` decides whether it names a user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized - invalid auth header")]
    InvalidHeader,

    #[error("unauthorized - invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("unauthorized - invalid token payload")]
    InvalidPayload,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token lifetime of {0} hours is out of range")]
    InvalidExpiry(u64),
}

impl Claims {
    pub fn new(user_id: i32, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?;

        Ok(Self {
            id: Some(Value::from(user_id)),
            exp: Some(exp.timestamp()),
            iat: Some(now.timestamp()),
        })
    }

    /// Resolve the caller identity. Only non-zero integers (or numeric strings) in i32 range qualify.
    pub fn caller_id(&self) -> Result<i32, AuthError> {
        let id = match self.id.as_ref() {
            Some(Value::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
            _ => None,
        };

        match id {
            Some(id) if id != 0 => Ok(id),
            _ => Err(AuthError::InvalidPayload),
        }
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // Tokens from the login service may omit `exp`; it is still checked when present
    validation.required_spec_claims.clear();
    validation
}

/// Verify the signature and decode the payload
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &validation())
        .map(|data| data.claims)
        .map_err(AuthError::InvalidToken)
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}
