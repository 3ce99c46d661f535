//! Error types for the core library.

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Classification request failed.
    #[error(transparent)]
    Client(#[from] mailverdict_client::Error),

    /// The service's answer decoded but its values are unusable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Writing to the clipboard failed.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

impl Error {
    /// Short machine-friendly name of the error kind, for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Client(e) => e.kind(),
            Self::InvalidResponse(_) => "invalid_response",
            Self::Clipboard(_) => "clipboard",
        }
    }

    /// Message suitable for showing to the person who submitted the email.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::InvalidResponse(_) => {
                "The classification service returned an unreadable response.".into()
            }
            Self::Clipboard(_) => "Could not copy to the clipboard.".into(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
