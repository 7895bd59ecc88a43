/// All errors that can be returned by a `ResourceApi` implementation.
///
/// Every variant is recoverable: the card converts it into a notification
/// and never propagates it further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// timeout, DNS failure).
    #[error("request failed: {message}")]
    Transport { message: String },

    /// The server answered with a non-2xx status. `message` is the `message`
    /// field of the JSON error body, when there was one.
    #[error("server responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// A 2xx body that is not valid JSON or does not fit the resource schema.
    #[error("unexpected response body: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            message: Some(message.into()),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode {
            message: message.into(),
        }
    }

    /// The server-reported `message`, for API failures that carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.is_empty() => Some(m),
            _ => None,
        }
    }

    /// Text shown to the user: the server's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401, which the HTTP client treats as session expiry.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}
