//! Payload normalization.
//!
//! The three target protocols disagree about where display text lives, both
//! per streamed event and per complete response. These functions extract a
//! plain-text fragment from any of the known shapes, returning an empty
//! string when nothing recognizable is present (the caller treats that as
//! "this frame contributes nothing", never as an error).

use serde_json::Value;

/// Recursively collect text from a content value.
///
/// Strings pass through; arrays concatenate their items in order; objects
/// yield their `text` or `output_text` string field, else recurse into a
/// nested `content` field.
pub fn collect_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(collect_text).collect(),
        Value::Object(obj) => {
            if let Some(Value::String(text)) = obj.get("text") {
                return text.clone();
            }
            if let Some(Value::String(text)) = obj.get("output_text") {
                return text.clone();
            }
            if let Some(content) = obj.get("content") {
                return collect_text(content);
            }
            String::new()
        }
        _ => String::new(),
    }
}

fn nonempty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

/// Extract the display-text fragment from one streamed event payload.
///
/// Attempts the known shapes in a fixed order and returns the first
/// non-empty result; empty string when no shape matches.
pub fn extract_stream_text(payload: &Value) -> String {
    let choice = payload.pointer("/choices/0");

    if let Some(text) = nonempty_str(choice.and_then(|c| c.pointer("/delta/content"))) {
        return text.to_string();
    }
    if let Some(text) = nonempty_str(choice.and_then(|c| c.pointer("/delta/reasoning_content"))) {
        return text.to_string();
    }
    if let Some(text) = nonempty_str(choice.and_then(|c| c.pointer("/message/content"))) {
        return text.to_string();
    }
    // Anthropic-style deltas: either a bare string or {"text": ...}
    if let Some(text) = nonempty_str(payload.get("delta")) {
        return text.to_string();
    }
    if let Some(text) = nonempty_str(payload.pointer("/delta/text")) {
        return text.to_string();
    }
    if let Some(text) = nonempty_str(payload.get("text")) {
        return text.to_string();
    }
    if let Some(text) = nonempty_str(payload.pointer("/content_block/text")) {
        return text.to_string();
    }
    if let Some(content) = payload.get("content") {
        return collect_text(content);
    }
    String::new()
}

/// Extract display text from a complete non-streamed response body.
///
/// Empty string means nothing recognizable was found; the caller falls back
/// to showing the raw serialized body.
pub fn extract_response_text(body: &Value) -> String {
    if let Some(choices) = body.get("choices").and_then(|c| c.as_array()) {
        return choices
            .iter()
            .filter_map(|choice| {
                nonempty_str(choice.pointer("/message/content"))
                    .or_else(|| nonempty_str(choice.get("text")))
            })
            .collect::<Vec<_>>()
            .join("\n");
    }
    if let Some(output) = body.get("output").and_then(|o| o.as_array()) {
        return output
            .iter()
            .map(|item| {
                if let Some(content) = item.get("content") {
                    collect_text(content)
                } else if let Some(text) = nonempty_str(item.get("text")) {
                    text.to_string()
                } else {
                    String::new()
                }
            })
            .collect();
    }
    if let Some(content) = body.get("content").filter(|c| c.is_array()) {
        return collect_text(content);
    }
    if let Some(text) = nonempty_str(body.get("output_text")) {
        return text.to_string();
    }
    if let Some(text) = nonempty_str(body.get("text")) {
        return text.to_string();
    }
    String::new()
}
