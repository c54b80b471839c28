use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccessToken, AuthError};
use crate::models::Identity;

/// Audience stamped on tokens for signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub aud: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(identity: &Identity, expiry_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.id,
            email: identity.email.clone(),
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            role: AUTHENTICATED_AUDIENCE.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Verifies HS256 access tokens locally with the auth service's secret.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: String,
}

impl TokenVerifier {
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::Config("JWT secret not configured".to_string()));
        }
        Ok(Self { secret })
    }

    pub fn issue(&self, claims: &Claims) -> Result<AccessToken, AuthError> {
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key)
            .map(AccessToken::new)
            .map_err(|e| AuthError::Config(format!("JWT generation error: {}", e)))
    }

    pub fn verify(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        let data = decode::<Claims>(token.as_str(), &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(Identity::new(data.claims.sub, data.claims.email))
    }
}
