//! Error types for remote Graph API operations.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when calling the remote Graph API.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The API reported an error: a non-2xx status, or an error envelope
    /// embedded in a 2xx body.
    #[error("API error: {message}")]
    Api { message: String },

    /// Network or connection failure (timeout, DNS, reset).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The response body could not be decoded.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// The pagination cursor chain exceeded the safety bound.
    #[error("pagination exceeded {limit} cursor follows")]
    PaginationLimit { limit: usize },
}

impl GraphError {
    /// Create an API error.
    #[inline]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<HttpError> for GraphError {
    fn from(err: HttpError) -> Self {
        GraphError::transport(err.to_string())
    }
}

/// Whether an error is a transient transport failure worth retrying.
///
/// API-level errors (bad token, unknown path, malformed request) are not
/// retried: the same request would fail the same way.
#[must_use]
pub fn is_transient_error(err: &GraphError) -> bool {
    matches!(err, GraphError::Transport { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_map_to_transport() {
        let err: GraphError = HttpError::Transport("connection reset".to_string()).into();
        assert!(matches!(err, GraphError::Transport { .. }));
        assert!(is_transient_error(&err));
    }

    #[test]
    fn api_and_decode_errors_are_not_transient() {
        assert!(!is_transient_error(&GraphError::api("invalid token")));
        assert!(!is_transient_error(&GraphError::decode("bad json")));
        assert!(!is_transient_error(&GraphError::PaginationLimit {
            limit: 500
        }));
    }

    #[test]
    fn display_includes_message() {
        let err = GraphError::api("(#100) Unsupported get request");
        assert_eq!(
            err.to_string(),
            "API error: (#100) Unsupported get request"
        );
    }
}
