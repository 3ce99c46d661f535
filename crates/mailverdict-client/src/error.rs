//! Error types for classification requests.

use std::io;

/// Result type alias for classification requests.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification client error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller's input cannot be turned into a request.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The service answered with a non-success status.
    ///
    /// `message` is the body's `detail` when present, otherwise the
    /// endpoint's generic fallback.
    #[error("{message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message to show to the user.
        message: String,
    },

    /// The service answered successfully but the body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service answered successfully but the body could not be read in
    /// full (truncated or reset mid-body).
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The request never produced a status (DNS, refused connection, reset).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error while reading an upload.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates a service error from a status code and message.
    #[must_use]
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Short machine-friendly name of the error kind, for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Service { .. } => "service",
            Self::Decode(_) => "decode",
            Self::Body(_) => "body",
            Self::Transport(_) => "transport",
            Self::InvalidConfig(_) => "config",
            Self::Url(_) => "url",
            Self::Io(_) => "io",
        }
    }

    /// Message suitable for showing to the person who submitted the email.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.message().to_string(),
            Self::Service { message, .. } => message.clone(),
            Self::Decode(_) | Self::Body(_) => {
                "The classification service returned an unreadable response.".into()
            }
            Self::Transport(_) => "Could not reach the classification service.".into(),
            Self::InvalidConfig(_) | Self::Url(_) => {
                "The classification service is not configured correctly.".into()
            }
            Self::Io(e) => format!("Could not read the selected file: {e}"),
        }
    }
}

/// Why a request draft was rejected before reaching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither email text nor a file was supplied.
    MissingInput,
    /// Both email text and a file were supplied.
    AmbiguousInput,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingInput => "Either content or file must be provided.",
            Self::AmbiguousInput => "Provide either content or a file, not both.",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_displays_message_only() {
        let err = Error::service(500, "model unavailable");
        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(err.user_message(), "model unavailable");
        assert_eq!(err.kind(), "service");
    }

    #[test]
    fn test_validation_error_message() {
        let err = Error::from(ValidationError::MissingInput);
        assert_eq!(err.kind(), "validation");
        assert_eq!(
            err.user_message(),
            "Either content or file must be provided."
        );
    }

    #[test]
    fn test_decode_error_has_generic_user_message() {
        let err = Error::from(serde_json::from_str::<u32>("nope").unwrap_err());
        assert_eq!(err.kind(), "decode");
        assert!(err.user_message().contains("unreadable"));
    }
}
