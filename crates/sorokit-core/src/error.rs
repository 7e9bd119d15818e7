//! Error types for the SoroKit codec, poller and RPC client.
//!
//! Every error is `Clone` so it can be stored in a poller's shared state and
//! handed out in snapshots.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors raised while encoding a native value into a wire value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The supplied value cannot be represented under the requested hint.
    #[error("Unsupported value for hint '{hint}': {reason}")]
    UnsupportedValue { hint: String, reason: String },
}

impl EncodeError {
    pub fn unsupported(hint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            hint: hint.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while parsing binary or text-encoded wire values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireFormatError {
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Unknown {what} discriminant {value}")]
    UnknownDiscriminant { what: &'static str, value: u32 },

    #[error("Wire tag {tag} is not supported")]
    UnsupportedTag { tag: u32 },

    #[error("Invalid UTF-8 in {what}")]
    InvalidUtf8 { what: &'static str },

    #[error("Non-zero padding byte")]
    InvalidPadding,

    #[error("{count} trailing bytes after value")]
    TrailingBytes { count: usize },

    #[error("Invalid base64 text: {0}")]
    Base64(String),

    #[error("Nesting deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Errors that can occur while talking to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response was missing expected fields or could not be deserialized.
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::malformed(e.to_string())
    }
}

/// Errors surfaced by an event poller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollerError {
    #[error("Event fetch failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Poller has been disposed")]
    Disposed,
}

/// Errors from a simulated contract invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("Argument {index}: {source}")]
    Encode {
        index: usize,
        #[source]
        source: EncodeError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Return value: {0}")]
    Wire(#[from] WireFormatError),

    #[error("Simulation failed: {0}")]
    Simulation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_errors_become_malformed_response() {
        let err: TransportError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, TransportError::MalformedResponse { .. }));
    }

    #[test]
    fn unsupported_value_message() {
        let err = EncodeError::unsupported("bytes", "not hex");
        assert_eq!(err.to_string(), "Unsupported value for hint 'bytes': not hex");
    }
}
