//! Pulls a JSON object out of free-form model output.
//!
//! A fenced ```` ```json ```` block wins; otherwise the span from the first
//! `{` to the last `}` is tried. Whichever candidate is found is the only
//! one parsed.

use domains::ExtractError;
use serde::de::DeserializeOwned;
use serde_json::Value;

const FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "\n```";

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &text[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(&rest[..end])
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let candidate = fenced_block(text)
        .or_else(|| brace_span(text))
        .ok_or(ExtractError::NotFound)?;
    serde_json::from_str(candidate).map_err(|e| ExtractError::Invalid(e.to_string()))
}

/// [`extract_json`] followed by a typed conversion.
pub fn extract_json_as<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| ExtractError::Invalid(e.to_string()))
}
