//! Plain-text rendering of a classification result.

use std::fmt::Write;

use mailverdict_core::ClassificationResult;

/// Longest source excerpt shown before truncating.
const EXCERPT_CHARS: usize = 160;

/// Renders a result for the terminal.
pub fn render_result(result: &ClassificationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Category:   {} ({}% confidence)",
        result.category,
        result.confidence_percent()
    );
    if let Some(file) = &result.extracted_file {
        let _ = writeln!(out, "File:       {} ({} bytes)", file.filename, file.size_bytes);
    }
    let _ = writeln!(out, "Processed:  {}", result.processed_at.to_rfc3339());
    let _ = writeln!(out, "Email:      {}", excerpt(&result.source_content));
    out.push('\n');

    out.push_str("Reasoning:\n");
    push_indented(&mut out, &result.reasoning);
    out.push('\n');

    out.push_str("Suggested response:\n");
    push_indented(&mut out, &result.suggested_response);

    out
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "  {line}");
    }
}

/// First line of the email, shortened to [`EXCERPT_CHARS`].
fn excerpt(text: &str) -> String {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if first_line.chars().count() > EXCERPT_CHARS {
        let cut: String = first_line.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}…")
    } else {
        first_line.to_string()
    }
}
