//! Collapses the two success payloads into one [`ClassificationResult`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use mailverdict_client::{ClassificationFields, RawResponse};
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{ClassificationResult, ExtractedFile};

/// Builds the canonical result from a decoded service response.
///
/// Text responses never echo the email back, so `fallback_content` (the text
/// the caller submitted) becomes the result's source content. File responses
/// carry the extracted text and the file's name and size.
///
/// # Errors
///
/// Returns [`Error::InvalidResponse`] if `confidence` is outside `[0, 1]`.
/// A `processed_at` that is not ISO-8601 is replaced by the current time.
pub fn normalize(raw: RawResponse, fallback_content: &str) -> Result<ClassificationResult> {
    match raw {
        RawResponse::Text(fields) => from_fields(fields, fallback_content.to_string(), None),
        RawResponse::File(file) => from_fields(
            file.classification,
            file.content_extracted,
            Some(ExtractedFile {
                filename: file.filename,
                size_bytes: file.size,
            }),
        ),
    }
}

fn from_fields(
    fields: ClassificationFields,
    source_content: String,
    extracted_file: Option<ExtractedFile>,
) -> Result<ClassificationResult> {
    if !fields.confidence.is_finite() || !(0.0..=1.0).contains(&fields.confidence) {
        return Err(Error::InvalidResponse(format!(
            "confidence {} is outside [0, 1]",
            fields.confidence
        )));
    }

    Ok(ClassificationResult {
        category: fields.category,
        confidence: fields.confidence,
        reasoning: fields.reasoning,
        suggested_response: fields.suggested_response,
        processed_at: parse_timestamp(&fields.processed_at).unwrap_or_else(|| {
            warn!(value = %fields.processed_at, "unparseable processed_at, using receipt time");
            Utc::now()
        }),
        source_content,
        extracted_file,
    })
}

/// Offset-carrying forms tried after RFC 3339. `%#z` takes `Z`, `+00`,
/// `+0000` and `+00:00`.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%#z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
];

/// Parses an ISO-8601 timestamp.
///
/// Timestamps without an offset are taken as UTC, and a bare date as
/// midnight UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::unreadable_literal,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mailverdict_client::{Category, FileClassification};
    use proptest::prelude::*;

    fn fields(category: Category, confidence: f64, processed_at: &str) -> ClassificationFields {
        ClassificationFields {
            category,
            confidence,
            suggested_response: "Confirmado.".into(),
            reasoning: "Solicita ação objetiva.".into(),
            processed_at: processed_at.into(),
        }
    }

    fn nested(fields: ClassificationFields) -> RawResponse {
        RawResponse::File(FileClassification {
            filename: "notes.txt".into(),
            size: 128,
            content_extracted: "extracted body".into(),
            classification: fields,
        })
    }

    #[test]
    fn test_text_response_keeps_submitted_text() {
        let raw = RawResponse::Text(fields(Category::Productive, 0.92, "2024-01-01T10:00:00Z"));
        let result = normalize(raw, "Reunião às 10h, favor confirmar presença").unwrap();

        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.source_content, "Reunião às 10h, favor confirmar presença");
        assert_eq!(result.extracted_file, None);
        assert_eq!(
            result.processed_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_file_response_uses_extracted_text_and_meta() {
        let raw = nested(fields(Category::Unproductive, 0.3, "2024-01-01T10:00:00Z"));
        let result = normalize(raw, "ignored").unwrap();

        assert_eq!(result.source_content, "extracted body");
        assert_eq!(
            result.extracted_file,
            Some(ExtractedFile {
                filename: "notes.txt".into(),
                size_bytes: 128,
            })
        );
        assert!(result.is_from_file());
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T07:00:00-03:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01 10:00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-01-01T10:00:00.123456").unwrap(),
            expected + chrono::Duration::microseconds(123456)
        );
    }

    #[test]
    fn test_iso8601_variants() {
        let ten = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let cases = [
            ("2024-01-01T10:00Z", ten),
            ("2024-01-01T10:00", ten),
            ("2024-01-01T10:00:00+0000", ten),
            ("2024-01-01T07:00:00-0300", ten),
            ("2024-01-01T12:00:00+02", ten),
            ("2024-01-01 10:00:00+00:00", ten),
            ("20240101T100000Z", ten),
            ("20240101T100000", ten),
            ("2024-01-01", midnight),
            ("  2024-01-01T10:00:00Z\n", ten),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_timestamp(input), Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn test_garbage_timestamps_do_not_parse() {
        for input in ["yesterday", "", "2024-13-01", "10:00:00"] {
            assert_eq!(parse_timestamp(input), None, "input {input:?}");
        }
    }

    #[test]
    fn test_unparseable_timestamp_falls_back_to_receipt_time() {
        let before = Utc::now();
        let raw = RawResponse::Text(fields(Category::Productive, 0.5, "yesterday"));
        let result = normalize(raw, "x").unwrap();
        let after = Utc::now();

        assert_eq!(result.category, Category::Productive);
        assert!(result.processed_at >= before && result.processed_at <= after);
    }

    #[test]
    fn test_confidence_out_of_range_is_rejected() {
        for confidence in [-0.1, 1.5, f64::NAN] {
            let raw = RawResponse::Text(fields(Category::Productive, confidence, "2024-01-01T10:00:00Z"));
            assert!(normalize(raw, "x").is_err());
        }
    }

    fn category() -> impl Strategy<Value = Category> {
        prop_oneof![Just(Category::Productive), Just(Category::Unproductive)]
    }

    proptest! {
        #[test]
        fn prop_flat_and_nested_agree(
            category in category(),
            confidence in 0.0f64..=1.0,
            reasoning in ".*",
            reply in ".*",
            secs in 0i64..4_000_000_000,
            submitted in ".*",
        ) {
            let processed_at = DateTime::from_timestamp(secs, 0).unwrap().to_rfc3339();
            let shared = ClassificationFields {
                category,
                confidence,
                suggested_response: reply,
                reasoning,
                processed_at,
            };

            let flat = normalize(RawResponse::Text(shared.clone()), &submitted).unwrap();
            let mut from_file = normalize(nested(shared), &submitted).unwrap();

            prop_assert_eq!(&flat.source_content, &submitted);
            prop_assert_eq!(&from_file.source_content, "extracted body");

            from_file.source_content = flat.source_content.clone();
            from_file.extracted_file = None;
            prop_assert_eq!(flat, from_file);
        }
    }
}
