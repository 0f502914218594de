//! Request field layout around the file.

use filesend_protocol::{Base64FilePart, MetaValue, MetadataBag};
use serde_json::{Map, Value};

/// Field that carries the file: the metadata key aliasing the file if there
/// is one, otherwise `default`.
pub fn resolve_field_name(meta: &MetadataBag, default: &str) -> String {
    meta.file_key().unwrap_or(default).to_string()
}

/// Metadata entries as multipart text fields.
///
/// File aliases, null values and any entry named `file_field` are left
/// out. Strings are sent as-is; everything else as compact JSON.
pub fn form_fields(meta: &MetadataBag, file_field: &str) -> Vec<(String, String)> {
    meta.iter()
        .filter(|(key, _)| *key != file_field)
        .filter_map(|(key, value)| match value {
            MetaValue::File | MetaValue::Value(Value::Null) => None,
            MetaValue::Value(Value::String(s)) => Some((key.to_string(), s.clone())),
            MetaValue::Value(other) => Some((key.to_string(), other.to_string())),
        })
        .collect()
}

/// JSON body for a base64 upload: a copy of the metadata with `file_field`
/// set to the encoded file.
///
/// Values keep their JSON types, nulls included. File aliases other than
/// `file_field` have no JSON form and are dropped.
pub fn base64_payload(
    meta: &MetadataBag,
    file_field: &str,
    part: Base64FilePart,
) -> Result<Map<String, Value>, serde_json::Error> {
    let mut payload: Map<String, Value> = meta
        .iter()
        .filter_map(|(key, value)| match value {
            MetaValue::File => None,
            MetaValue::Value(v) => Some((key.to_string(), v.clone())),
        })
        .collect();
    payload.insert(file_field.to_string(), serde_json::to_value(part)?);
    Ok(payload)
}
