//! Wire envelope types for the line-delimited JSON protocol.
//!
//! One JSON object per line. Requests carry `{id, method, params}`;
//! responses carry `{id, success, result | error}`. The `id` is echoed
//! back whenever it could be recovered, so callers can correlate
//! responses even though the sequential loop already preserves order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServerError;

/// An incoming request: one decoded line.
///
/// Constructed per message, immutable, discarded after dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    /// Caller-chosen correlation id.
    pub id: String,

    /// The operation to invoke.
    pub method: String,

    /// Method parameters; `null` when the caller sent none.
    #[serde(default)]
    pub params: Value,
}

/// The error half of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Machine-readable error kind (see the error taxonomy).
    pub kind: String,

    /// Human-readable description, suitable for direct display.
    pub message: String,

    /// Structured context for programmatic handling.
    #[serde(default = "empty_object")]
    pub details: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ErrorData {
    /// Creates an error with empty details.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            details: empty_object(),
        }
    }

    /// Attaches structured context.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Error for a method missing from the routing table.
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new("MethodNotFoundError", format!("unknown method '{method}'"))
    }

    /// Error for a line that could not be decoded into a request.
    #[must_use]
    pub fn malformed(reason: &str) -> Self {
        Self::new("MalformedMessageError", format!("malformed message: {reason}"))
    }

    /// Error for a request missing a required parameter.
    #[must_use]
    pub fn missing_param(name: &str) -> Self {
        Self::new(
            "ValidationError",
            format!("required parameter '{name}' is missing"),
        )
    }
}

impl From<&ServerError> for ErrorData {
    fn from(error: &ServerError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            details: error.details(),
        }
    }
}

/// An outgoing response: one encoded line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Correlation id echoed from the request, when recoverable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether the operation succeeded.
    pub success: bool,

    /// Operation result; present exactly when `success` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error description; present exactly when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorData>,
}

impl ResponseEnvelope {
    /// Creates a success response.
    #[must_use]
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: Some(id.into()),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a failure response.
    #[must_use]
    pub const fn failure(id: Option<String>, error: ErrorData) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Why a line could not be decoded into a [`RequestEnvelope`].
///
/// When the `id` was recoverable the loop answers with a
/// `MalformedMessageError` envelope; otherwise the error is logged and
/// the line discarded.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    /// Correlation id, when one could be pulled out of the line.
    pub id: Option<String>,
    /// What was wrong with the line.
    pub reason: String,
}

/// Decodes one line into a request envelope.
///
/// # Errors
///
/// Returns a [`ParseFailure`] if the line is not valid JSON, not an
/// object, or not a structurally valid request.
pub fn parse_request(line: &str) -> Result<RequestEnvelope, ParseFailure> {
    let value: Value = serde_json::from_str(line).map_err(|e| ParseFailure {
        id: None,
        reason: format!("invalid JSON: {e}"),
    })?;

    let Some(object) = value.as_object() else {
        return Err(ParseFailure {
            id: None,
            reason: "message is not a JSON object".to_string(),
        });
    };

    // Recover the id before full decoding so structural errors can
    // still be answered in-band.
    let id = object.get("id").and_then(Value::as_str).map(String::from);

    let envelope: RequestEnvelope = serde_json::from_value(value).map_err(|e| ParseFailure {
        id: id.clone(),
        reason: format!("invalid request envelope: {e}"),
    })?;

    if envelope.method.is_empty() {
        return Err(ParseFailure {
            id: Some(envelope.id),
            reason: "method must not be empty".to_string(),
        });
    }

    Ok(envelope)
}
