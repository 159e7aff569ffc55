//! Wire contract shared by every backend response.
//!
//! Success: `{ "ok": true, "data": T, "meta": { "status", "request_id" } }`
//! Failure: `{ "ok": false, "error": { "code", "message", "details"? }, "meta": {..} }`
//!
//! The token endpoints answer with bare bodies (`{access, refresh}`), so a 2xx
//! response that is not an envelope is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::error::{ApiError, ApiFailure, TransportFailure};
use super::transport::RawResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimited,
    ServerError,
    /// Generic failure; also absorbs codes this client does not know.
    #[default]
    #[serde(other)]
    Error,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::ServerError => "server_error",
            ErrorCode::Error => "error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl ErrorBody {
    /// Stand-in for an `ok: false` envelope whose `error` is absent or unreadable.
    fn malformed() -> Self {
        Self {
            code: ErrorCode::Error,
            message: "Malformed error envelope".to_string(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success { data: Value, meta: ResponseMeta },
    Failure { error: ErrorBody, meta: ResponseMeta },
}

impl Envelope {
    /// Recognise an envelope in a decoded body. Anything without a boolean
    /// `ok` field is not one; `ok: false` is always a failure.
    pub fn from_value(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let ok = object.get("ok")?.as_bool()?;
        let meta = object
            .get("meta")
            .and_then(|meta| serde_json::from_value(meta.clone()).ok())
            .unwrap_or_default();

        if ok {
            let data = object.get("data").cloned().unwrap_or(Value::Null);
            return Some(Envelope::Success { data, meta });
        }

        let error = object
            .get("error")
            .and_then(|error| serde_json::from_value(error.clone()).ok())
            .unwrap_or_else(ErrorBody::malformed);
        Some(Envelope::Failure { error, meta })
    }
}

/// Turn a raw response into unwrapped `data` or a classified error.
pub(crate) fn classify(response: &RawResponse) -> Result<Value, ApiError> {
    let status = response.status.as_u16();
    let body = decode_body(&response.body);

    match body.as_ref().and_then(Envelope::from_value) {
        Some(Envelope::Success { data, .. }) => Ok(data),
        Some(Envelope::Failure { error, meta }) => Err(ApiError::Api(ApiFailure {
            code: error.code,
            message: error.message,
            details: error.details,
            status: meta.status.unwrap_or(status),
            request_id: meta.request_id.or_else(|| response.request_id.clone()),
        })),
        None if response.status.is_success() => match body {
            Some(value) => Ok(value),
            None if response.body.is_empty() => Ok(Value::Null),
            None => Err(ApiError::Decode(format!(
                "response body is not JSON ({} bytes)",
                response.body.len()
            ))),
        },
        None => {
            let message = response
                .status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            Err(ApiError::Transport(TransportFailure::status(
                status,
                message,
                response.request_id.clone(),
            )))
        }
    }
}

fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}
