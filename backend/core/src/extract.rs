//! Defensive extraction from raw response envelopes.
//!
//! Every helper is total: a structural mismatch at any nesting level yields
//! `None` instead of an error, so callers decide explicitly what a missing
//! reply degrades to. Whitespace-only text counts as missing.

use serde_json::Value;

/// Assistant text from a chat-completions envelope
/// (`choices[0].message.content`).
pub fn chat_message_text(raw: &Value) -> Option<&str> {
    let text = raw
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;
    non_blank(text)
}

/// Aggregated output text from a threading-style envelope (`output_text`).
pub fn aggregated_output_text(raw: &Value) -> Option<&str> {
    non_blank(raw.get("output_text")?.as_str()?)
}

/// Response identifier from a threading-style envelope (`id`), used as the
/// continuation token for the next request.
pub fn response_id(raw: &Value) -> Option<&str> {
    non_blank(raw.get("id")?.as_str()?)
}

fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
