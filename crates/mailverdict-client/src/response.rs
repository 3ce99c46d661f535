//! Response payloads as received from the classification service.

use serde::{Deserialize, Serialize};

/// Classification verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The email needs action or a reply.
    Productive,
    /// The email needs no action.
    Unproductive,
}

impl Category {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Productive => "Productive",
            Self::Unproductive => "Unproductive",
        }
    }

    /// Returns true for [`Category::Productive`].
    #[must_use]
    pub const fn is_productive(&self) -> bool {
        matches!(self, Self::Productive)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five classification fields shared by both success payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationFields {
    /// Verdict.
    pub category: Category,
    /// Score in `[0, 1]` for the verdict.
    pub confidence: f64,
    /// Reply the service suggests sending.
    pub suggested_response: String,
    /// Explanation of the verdict.
    pub reasoning: String,
    /// ISO-8601 timestamp of when the service processed the email.
    pub processed_at: String,
}

/// Success payload of `POST /api/classify/file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileClassification {
    /// Name of the uploaded file.
    pub filename: String,
    /// Size of the uploaded file in bytes.
    pub size: u64,
    /// Text the service extracted from the file.
    pub content_extracted: String,
    /// The verdict.
    pub classification: ClassificationFields,
}

/// A decoded success payload, tagged by the endpoint that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Flat body from the text endpoint.
    Text(ClassificationFields),
    /// Nested body from the file endpoint.
    File(FileClassification),
}

impl RawResponse {
    /// The classification fields, whichever shape they came in.
    #[must_use]
    pub const fn fields(&self) -> &ClassificationFields {
        match self {
            Self::Text(fields) => fields,
            Self::File(file) => &file.classification,
        }
    }
}

/// Error body sent with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Extracts `detail` from an error body, if the body is JSON and has one.
    pub fn detail_from(bytes: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(bytes)
            .ok()
            .and_then(|body| body.detail)
            .filter(|detail| !detail.is_empty())
    }
}
