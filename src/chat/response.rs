// Response normalization: model output becomes one displayable string.

use crate::models::GenerateContentResponse;
use tracing::debug;

/// Extract the generated text from the first candidate, if any.
///
/// Multiple text parts are concatenated in order. Returns `None` when the
/// response has no candidates or no text parts.
pub fn extract_text(resp: &GenerateContentResponse) -> Option<String> {
    let candidate = resp.candidates.first()?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .filter_map(|p| p.as_text())
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Normalize a response to its displayable form.
///
/// When the response exposes generated text, that exact text is returned.
/// Otherwise the response's JSON string form is returned unchanged, so the
/// user still sees what came back.
pub fn normalize(resp: GenerateContentResponse) -> String {
    if let Some(text) = extract_text(&resp) {
        return text;
    }

    debug!("Response carried no text parts, falling back to string form");
    serde_json::to_string(&resp).unwrap_or_else(|_| format!("{:?}", resp))
}
