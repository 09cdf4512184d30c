//! Result Parser — turns the capability's free-form text reply into a typed
//! `AnalysisReport`.
//!
//! Models reliably emit near-JSON with leading/trailing noise, so a single
//! strict parse is not enough. The parse is two-tier: strict decode of the
//! fence-stripped text, then extract-and-retry on the outermost `{...}`.

use serde_json::Value;
use tracing::warn;

use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;

/// How much of a bad reply goes into the diagnostic log.
const LOG_SNIPPET_CHARS: usize = 500;

pub fn parse_report(raw: &str) -> Result<AnalysisReport, AppError> {
    let cleaned = strip_json_fences(raw);

    // Tier 1: the cleaned text is the JSON object.
    // Tier 2: the object is embedded in prose; take first '{' to last '}'.
    let value = serde_json::from_str::<Value>(cleaned)
        .ok()
        .or_else(|| {
            extract_json_object(cleaned).and_then(|candidate| serde_json::from_str(candidate).ok())
        })
        .ok_or_else(|| AppError::MalformedResponse(log_snippet(raw)))?;

    let mut report: AnalysisReport = serde_json::from_value(value)
        .map_err(|e| AppError::IncompleteResponse(format!("{e}; reply: {}", log_snippet(raw))))?;

    if report.match_score > 100 {
        warn!(
            "capability returned matchScore {} — clamping to 100",
            report.match_score
        );
        report.match_score = 100;
    }

    Ok(report)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Substring from the first `{` to the last `}`, inclusive.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

fn log_snippet(raw: &str) -> String {
    raw.chars().take(LOG_SNIPPET_CHARS).collect()
}
