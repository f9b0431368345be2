//! Reply extraction from JSON bodies of unknown shape.
//!
//! Shapes are tried in a fixed priority order and the first one that
//! applies decides the result, even when the text it yields is empty:
//!
//! 1. `choices[0].message.content`, else `choices[0].text`
//! 2. string `reply`, `response`, `answer`, `output`, `text`
//! 3. `[ { "text": ... } ]`
//! 4. `{ "data": [ { "text": ... } ] }`
//! 5. first non-empty string value, in document order
//!
//! Nothing applicable yields `""`. The result is always trimmed.

use serde_json::Value;

/// Named string fields checked after the chat-completion shape.
pub const REPLY_FIELDS: [&str; 5] = ["reply", "response", "answer", "output", "text"];

/// Pull the reply text out of `data`. Returns `""` when nothing fits.
#[must_use]
pub fn extract_reply(data: &Value) -> String {
    choices_shape(data)
        .or_else(|| named_field(data))
        .or_else(|| array_text(data))
        .or_else(|| data_array_text(data))
        .or_else(|| first_string(data))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// JavaScript-style truthiness for JSON values.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a scalar; structured values render as compact JSON.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn choices_shape(data: &Value) -> Option<String> {
    let first = data.get("choices")?.as_array()?.first()?;
    if !truthy(first) {
        return None;
    }

    if let Some(message) = first.get("message").filter(|m| truthy(m)) {
        if let Some(content) = message.get("content") {
            // An explicitly empty content string still decides the reply.
            if truthy(content) || content.as_str() == Some("") {
                return Some(as_text(content));
            }
        }
    }

    first.get("text").filter(|t| truthy(t)).map(as_text)
}

fn named_field(data: &Value) -> Option<String> {
    REPLY_FIELDS
        .iter()
        .find_map(|field| data.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

fn array_text(data: &Value) -> Option<String> {
    data.as_array()?
        .first()?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

fn data_array_text(data: &Value) -> Option<String> {
    data.get("data")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

fn first_string(data: &Value) -> Option<String> {
    let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);
    match data {
        Value::Object(map) => map.values().find_map(non_empty),
        Value::Array(items) => items.iter().find_map(non_empty),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(raw: &str) -> Value {
        serde_json::from_str(raw).expect("test body is valid JSON")
    }

    #[test]
    fn chat_completion_content() {
        assert_eq!(extract_reply(&json!({"choices": [{"message": {"content": "hi"}}]})), "hi");
        assert_eq!(
            extract_reply(&json!({"choices": [{"message": {"content": "  padded \n"}}]})),
            "padded"
        );
    }

    #[test]
    fn empty_content_short_circuits() {
        let body = json!({"choices": [{"message": {"content": ""}, "text": "ignored"}], "reply": "also ignored"});
        assert_eq!(extract_reply(&body), "");
    }

    #[test]
    fn choice_text_when_no_message() {
        assert_eq!(extract_reply(&json!({"choices": [{"text": " completion "}]})), "completion");
        // Null content falls through to text.
        assert_eq!(
            extract_reply(&json!({"choices": [{"message": {"content": null}, "text": "t"}]})),
            "t"
        );
    }

    #[test]
    fn numeric_content_is_stringified() {
        assert_eq!(extract_reply(&json!({"choices": [{"message": {"content": 42}}]})), "42");
    }

    #[test]
    fn named_fields_in_priority_order() {
        assert_eq!(extract_reply(&json!({"reply": "hello"})), "hello");
        assert_eq!(extract_reply(&json!({"text": "t", "answer": "a"})), "a");
        assert_eq!(extract_reply(&json!({"output": "o", "response": "r"})), "r");
        // A non-string field is skipped.
        assert_eq!(extract_reply(&json!({"reply": 7, "output": "o"})), "o");
        // A present but empty named field decides the result.
        assert_eq!(extract_reply(&json!({"reply": "", "zzz": "scan"})), "");
    }

    #[test]
    fn empty_choices_fall_through() {
        assert_eq!(extract_reply(&json!({"choices": [], "answer": "a"})), "a");
        assert_eq!(extract_reply(&json!({"choices": [null], "answer": "a"})), "a");
    }

    #[test]
    fn array_shapes() {
        assert_eq!(extract_reply(&json!([{"text": " first "}, {"text": "second"}])), "first");
        assert_eq!(extract_reply(&json!({"data": [{"text": "from data"}]})), "from data");
        assert_eq!(extract_reply(&json!({"data": [{"text": 1}], "note": "scan"})), "scan");
    }

    #[test]
    fn fallback_scan_uses_document_order() {
        assert_eq!(extract_reply(&json!({"foo": "bar"})), "bar");
        assert_eq!(extract_reply(&parse(r#"{"zeta": "z", "alpha": "a"}"#)), "z");
        assert_eq!(extract_reply(&parse(r#"{"n": 1, "empty": "", "msg": " found "}"#)), "found");
        assert_eq!(extract_reply(&json!(["", "second"])), "second");
    }

    #[test]
    fn nothing_usable() {
        assert_eq!(extract_reply(&Value::Null), "");
        assert_eq!(extract_reply(&json!(12)), "");
        assert_eq!(extract_reply(&json!({})), "");
        assert_eq!(extract_reply(&json!({"n": 1, "nested": {"reply": "deep"}})), "");
        assert_eq!(extract_reply(&json!({"blank": "   "})), "");
    }

    #[test]
    fn bare_json_string() {
        assert_eq!(extract_reply(&json!(" just text ")), "just text");
    }
}
