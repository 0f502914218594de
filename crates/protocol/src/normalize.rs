//! Response normalization: one file reference out of many reply shapes.

use serde_json::Value;

use crate::constants::{AUDIO_FIELD, DOCUMENT_FIELD, FILE_IDENTIFIER_KEY};

/// Extracts the canonical file reference from a server response body.
///
/// Rules, first match wins:
/// 1. the body is itself a string;
/// 2. `file_identifier`;
/// 3. `recorded_call`, then `letter_document`, when string-valued;
/// 4. `id`, in string form;
/// 5. `url`;
/// 6. `path`.
///
/// `None` means the upload succeeded but the server sent no usable
/// reference. It is not an error.
pub fn extract_file_ref(body: &Value) -> Option<String> {
    if let Value::String(s) = body {
        return Some(s.clone());
    }

    let obj = body.as_object()?;

    if let Some(r) = obj.get(FILE_IDENTIFIER_KEY).and_then(reference) {
        return Some(r);
    }

    for key in [AUDIO_FIELD, DOCUMENT_FIELD] {
        if let Some(Value::String(s)) = obj.get(key) {
            return Some(s.clone());
        }
    }

    ["id", "url", "path"]
        .into_iter()
        .find_map(|key| obj.get(key).and_then(reference))
}

/// String form of a scalar reference. Empty strings and non-scalars don't count.
fn reference(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_body() {
        assert_eq!(extract_file_ref(&json!("ref-1")).as_deref(), Some("ref-1"));
    }

    #[test]
    fn file_identifier_wins() {
        let body = json!({
            "file_identifier": "abc",
            "recorded_call": "xyz",
            "id": 7,
            "url": "https://cdn/x",
        });
        assert_eq!(extract_file_ref(&body).as_deref(), Some("abc"));
    }

    #[test]
    fn strategy_field() {
        assert_eq!(
            extract_file_ref(&json!({"recorded_call": "xyz"})).as_deref(),
            Some("xyz")
        );
        assert_eq!(
            extract_file_ref(&json!({"letter_document": "doc-9", "id": 1})).as_deref(),
            Some("doc-9")
        );
    }

    #[test]
    fn recorded_call_before_letter_document() {
        let body = json!({"letter_document": "d", "recorded_call": "r"});
        assert_eq!(extract_file_ref(&body).as_deref(), Some("r"));
    }

    #[test]
    fn non_string_strategy_field_is_skipped() {
        let body = json!({"recorded_call": {"nested": true}, "id": 42});
        assert_eq!(extract_file_ref(&body).as_deref(), Some("42"));
    }

    #[test]
    fn numeric_id_is_stringified() {
        assert_eq!(extract_file_ref(&json!({"id": 15})).as_deref(), Some("15"));
    }

    #[test]
    fn url_then_path() {
        let body = json!({"path": "/files/a", "url": "https://cdn/a"});
        assert_eq!(extract_file_ref(&body).as_deref(), Some("https://cdn/a"));
        assert_eq!(
            extract_file_ref(&json!({"path": "/files/a"})).as_deref(),
            Some("/files/a")
        );
    }

    #[test]
    fn empty_object_has_no_reference() {
        assert!(extract_file_ref(&json!({})).is_none());
    }

    #[test]
    fn null_and_arrays_have_no_reference() {
        assert!(extract_file_ref(&Value::Null).is_none());
        assert!(extract_file_ref(&json!([1, 2])).is_none());
    }

    #[test]
    fn null_identifier_falls_through() {
        let body = json!({"file_identifier": null, "url": "u"});
        assert_eq!(extract_file_ref(&body).as_deref(), Some("u"));
    }
}
