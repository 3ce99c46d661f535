//! Classification request types.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::locale::map_locale;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name as shown to the user and sent in the multipart part.
    pub name: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl FileUpload {
    /// Creates an upload from in-memory contents.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads an upload from disk, naming it after the path's final component.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, bytes))
    }

    /// Size of the upload in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A validated classification request.
///
/// Exactly one kind of input per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRequest {
    /// Pasted email text.
    Text {
        /// Email text, never empty.
        content: String,
        /// Service locale tag.
        locale: Option<String>,
    },
    /// Uploaded email file.
    File {
        /// The upload.
        file: FileUpload,
        /// Service locale tag.
        locale: Option<String>,
    },
}

impl ClassificationRequest {
    /// Endpoint this request is sent to.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Text { .. } => Endpoint::Text,
            Self::File { .. } => Endpoint::File,
        }
    }

    /// Locale tag carried by the request, if any.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Text { locale, .. } | Self::File { locale, .. } => locale.as_deref(),
        }
    }

    /// The submitted text, empty for file requests.
    #[must_use]
    pub fn submitted_text(&self) -> &str {
        match self {
            Self::Text { content, .. } => content,
            Self::File { .. } => "",
        }
    }
}

/// Raw user input as collected by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDraft {
    /// Typed or pasted email text.
    pub content: Option<String>,
    /// Selected file.
    pub file: Option<FileUpload>,
    /// UI language code (`pt`, `en`, `es`).
    pub language: Option<String>,
}

impl RequestDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft holding email text.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new().with_content(content)
    }

    /// Creates a draft holding a file.
    #[must_use]
    pub fn file(file: FileUpload) -> Self {
        Self::new().with_file(file)
    }

    /// Sets the email text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the file.
    #[must_use]
    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.file = Some(file);
        self
    }

    /// Sets the UI language code.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    /// Returns true when there is something to classify.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty()) || self.file.is_some()
    }

    /// Validates the draft and turns it into a request.
    ///
    /// Empty text counts as absent. The language code goes through
    /// [`map_locale`]; an unknown code leaves the locale unset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingInput`] when there is neither text
    /// nor a file, and [`ValidationError::AmbiguousInput`] when there are both.
    pub fn into_request(self) -> std::result::Result<ClassificationRequest, ValidationError> {
        let locale = self
            .language
            .as_deref()
            .and_then(map_locale)
            .map(str::to_string);
        let content = self.content.filter(|c| !c.is_empty());

        match (content, self.file) {
            (Some(content), None) => Ok(ClassificationRequest::Text { content, locale }),
            (None, Some(file)) => Ok(ClassificationRequest::File { file, locale }),
            (None, None) => Err(ValidationError::MissingInput),
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousInput),
        }
    }
}

/// Service endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/classify/text`.
    Text,
    /// `POST /api/classify/file`.
    File,
}

impl Endpoint {
    /// Path relative to the service base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Text => "/api/classify/text",
            Self::File => "/api/classify/file",
        }
    }

    /// Message used when a failed response carries no usable `detail`.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Text => "Failed to classify email text.",
            Self::File => "Failed to classify email file.",
        }
    }
}

/// JSON body of a text classification request.
#[derive(Debug, Serialize)]
pub(crate) struct TextBody<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
}
