//! The `{success, data, message, error}` wrapper every backend response uses.

use serde::Deserialize;
use serde_json::Value;

/// Wire-level response envelope. A missing `success` flag reads as `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeError {
    #[serde(default)]
    pub message: Option<String>,
}

/// What a response envelope amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `success` was true and `data` was present and non-null.
    Success {
        data: Value,
        message: Option<String>,
    },
    /// An `error` object was present.
    Failed { message: Option<String> },
    /// Neither usable data nor an error.
    Malformed,
}

impl Envelope {
    /// Read an envelope out of a raw body. `None` if the body does not have
    /// the envelope's shape at all.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        Envelope::deserialize(raw).ok()
    }

    pub fn into_outcome(self) -> Outcome {
        match self {
            Envelope {
                success: true,
                data: Some(data),
                message,
                ..
            } => Outcome::Success { data, message },
            Envelope {
                error: Some(error), ..
            } => Outcome::Failed {
                message: error.message,
            },
            _ => Outcome::Malformed,
        }
    }
}

/// Parse a response body and classify it. Bodies that are not JSON, or not
/// envelope-shaped, are malformed.
pub fn classify(body: &str) -> (Value, Outcome) {
    let raw = serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.to_string()));
    let outcome = Envelope::from_raw(&raw).map_or(Outcome::Malformed, Envelope::into_outcome);
    (raw, outcome)
}
