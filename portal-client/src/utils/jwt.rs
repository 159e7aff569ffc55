use crate::models::{Role, UserProfile};
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("Invalid JWT format")]
    Format,

    #[error("Failed to decode JWT payload: {0}")]
    Encoding(String),

    #[error("Failed to parse JWT claims: {0}")]
    Claims(String),
}

/// SimpleJWT-style access token claims. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl AccessClaims {
    pub fn into_profile(self) -> UserProfile {
        let id = match self.user_id {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };

        UserProfile {
            id,
            email: self.email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            username: self.username,
            role: self.role,
        }
    }
}

/// Decode JWT claims without validation.
///
/// The signature is NOT checked: the token was just handed out by the
/// backend over TLS and is only used here to populate the local profile.
pub fn decode_access_claims(token: &str) -> Result<AccessClaims, ClaimsError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClaimsError::Format);
    };

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClaimsError::Encoding(e.to_string()))?;

    serde_json::from_slice(&payload).map_err(|e| ClaimsError::Claims(e.to_string()))
}

/// Derive the user profile carried by an access token.
pub fn decode_user_profile(token: &str) -> Result<UserProfile, ClaimsError> {
    decode_access_claims(token).map(AccessClaims::into_profile)
}
