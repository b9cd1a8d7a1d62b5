//! Normalization routines for source field values.
//!
//! Two routines keep the indexed documents bounded: text truncation at a
//! sentence boundary, and numeric clamping against per-field maximums.

use serde_json::Value;

use listings_sync_shared::SourceNumber;

/// Maximum display-text length, in Unicode scalar values.
pub const TEXT_LIMIT: usize = 350;

/// The sentence terminator texts are cut and suffixed with.
const TERMINATOR: char = '.';

/// Bound a textual value while keeping whole sentences.
///
/// Strings longer than [`TEXT_LIMIT`] characters are truncated at the limit
/// and then cut again at the last terminator inside the truncated prefix, so
/// text never ends mid-sentence. When no terminator exists in the prefix the
/// raw truncated prefix is kept. With `trail_with_terminator` set, a
/// non-empty result that does not already end with the terminator gets one
/// appended.
///
/// Non-textual values pass through unchanged; in particular, nested mappings
/// handed to this routine are effectively copied as-is.
pub fn strip_long_text(value: &Value, trail_with_terminator: bool) -> Value {
    match value {
        Value::String(text) => Value::String(truncate_text(text, trail_with_terminator)),
        other => other.clone(),
    }
}

fn truncate_text(text: &str, trail_with_terminator: bool) -> String {
    let mut result = if text.chars().count() > TEXT_LIMIT {
        let prefix: String = text.chars().take(TEXT_LIMIT).collect();
        match prefix.rfind(TERMINATOR) {
            // Cut after the last full sentence; the terminator itself is
            // re-added below when trailing is requested.
            Some(pos) => prefix[..pos].to_string(),
            None => prefix,
        }
    } else {
        text.to_string()
    };

    if trail_with_terminator && !result.is_empty() && !result.ends_with(TERMINATOR) {
        result.push(TERMINATOR);
    }
    result
}

/// Coerce a numeric value to a float and cap it at `max_value`.
///
/// Handles both native numbers and arbitrary-precision decimal
/// representations from the source. Values above the bound are capped at the
/// bound; there is no lower clamp. Returns `None` when the value is not
/// coercible - callers treat that as a structural failure. Absent values
/// never reach this routine (absence passes through at the call site).
pub fn clamp_number(value: &Value, max_value: f64) -> Option<f64> {
    let coerced = SourceNumber::from_value(value)?.as_f64()?;
    if coerced > max_value {
        Some(max_value)
    } else {
        Some(coerced)
    }
}
