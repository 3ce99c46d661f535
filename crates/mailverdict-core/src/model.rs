//! Canonical classification result.

use chrono::{DateTime, Utc};
use mailverdict_client::Category;
use serde::Serialize;

/// Metadata about an uploaded file, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFile {
    /// File name.
    pub filename: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// A classification verdict, independent of how the email was submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Verdict.
    pub category: Category,
    /// Score in `[0, 1]` for the verdict.
    pub confidence: f64,
    /// Explanation of the verdict.
    pub reasoning: String,
    /// Reply the service suggests sending.
    pub suggested_response: String,
    /// When the service processed the email.
    pub processed_at: DateTime<Utc>,
    /// The text that was classified: what the user typed, or what the
    /// service extracted from the uploaded file.
    pub source_content: String,
    /// Present only when the email was uploaded as a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_file: Option<ExtractedFile>,
}

impl ClassificationResult {
    /// Confidence as a whole percentage, rounded half away from zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // confidence is within [0, 1]
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Returns true if the email was classified as productive.
    #[must_use]
    pub const fn is_productive(&self) -> bool {
        self.category.is_productive()
    }

    /// Returns true if the email was submitted as a file.
    #[must_use]
    pub const fn is_from_file(&self) -> bool {
        self.extracted_file.is_some()
    }
}
