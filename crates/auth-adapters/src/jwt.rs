//! HS256 bearer tokens, the format issued by the hosted auth service.
//!
//! Claims: `sub` (user id), `exp`, optional `org_id`.

use chrono::{Duration, Utc};
use domains::{AuthError, Session, SessionVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    org_id: Option<Uuid>,
}

pub struct JwtAuth {
    decoding: DecodingKey,
    encoding: EncodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // hosted auth stamps an audience we do not scope on
        validation.validate_aud = false;

        Self {
            decoding: DecodingKey::from_secret(bytes),
            encoding: EncodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Mints a token for `session`, valid for `ttl`. Used by the seed tool
    /// and tests; production tokens come from the auth service.
    pub fn issue(&self, session: &Session, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims {
            sub: session.user_id.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            org_id: session.organization_id,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Invalid(e.to_string()))
    }
}

impl SessionVerifier for JwtAuth {
    fn verify(&self, token: &str) -> Result<Session, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "rejected bearer token");
            AuthError::Invalid(e.to_string())
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AuthError::Invalid("sub is not a user id".into()))?;

        Ok(Session {
            user_id,
            organization_id: data.claims.org_id,
        })
    }
}
