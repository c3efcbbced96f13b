use serde_json::Value;

use crate::core::models::field_value::{FieldValue, Row};

/// Separator used by hosts for JSON column path assignments (`doc->a->b`).
const PATH_SEPARATOR: &str = "->";

/// Whether a column name addresses into a JSON document column.
pub fn is_json_path(column: &str) -> bool {
    column.contains(PATH_SEPARATOR)
}

/// Resolve the current value behind a JSON path assignment.
///
/// `doc->data->name` reads the row's `doc` column, parses it as JSON and
/// walks `data`, then `name`. Numeric segments index into arrays. Returns
/// `None` when the base column is absent, is not a JSON text document, or
/// the path walks off the document; callers log such changes with a null
/// old value rather than failing.
pub fn resolve_path(row: &Row, path: &str) -> Option<FieldValue> {
    let mut segments = path.split(PATH_SEPARATOR);
    let base = segments.next()?;

    let FieldValue::Text(raw) = row.get(base)? else {
        return None;
    };
    let mut current: Value = serde_json::from_str(raw).ok()?;

    for segment in segments {
        current = match current {
            Value::Object(mut map) => map.remove(segment)?,
            Value::Array(mut items) => {
                let index: usize = segment.parse().ok()?;
                if index >= items.len() {
                    return None;
                }
                items.swap_remove(index)
            }
            _ => return None,
        };
    }

    Some(to_field_value(current))
}

fn to_field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        Value::Number(n) => FieldValue::Number(n),
        Value::String(s) => FieldValue::Text(s),
        // Nested containers log as their compact JSON form
        other => FieldValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with_doc(doc: &str) -> Row {
        Row::new().with("id", 1).with("doc", doc)
    }

    #[test]
    fn detects_json_paths() {
        assert!(is_json_path("doc->name"));
        assert!(is_json_path("doc->data->name"));
        assert!(!is_json_path("name"));
    }

    #[test]
    fn resolves_single_level() {
        let row = row_with_doc(r#"{"name":"Alice","age":30}"#);
        assert_eq!(
            resolve_path(&row, "doc->name"),
            Some(FieldValue::Text("Alice".into()))
        );
        assert_eq!(
            resolve_path(&row, "doc->age"),
            Some(FieldValue::Number(30.into()))
        );
    }

    #[test]
    fn resolves_nested_levels() {
        let row = row_with_doc(r#"{"data":{"name":"Alice"}}"#);
        assert_eq!(
            resolve_path(&row, "doc->data->name"),
            Some(FieldValue::Text("Alice".into()))
        );
    }

    #[test]
    fn resolves_array_index() {
        let row = row_with_doc(r#"{"tags":["a","b"]}"#);
        assert_eq!(
            resolve_path(&row, "doc->tags->1"),
            Some(FieldValue::Text("b".into()))
        );
    }

    #[test]
    fn missing_key_is_none() {
        let row = row_with_doc(r#"{"name":"Alice"}"#);
        assert_eq!(resolve_path(&row, "doc->missing"), None);
    }

    #[test]
    fn non_json_document_is_none() {
        let row = row_with_doc("not json");
        assert_eq!(resolve_path(&row, "doc->name"), None);
    }

    #[test]
    fn absent_base_column_is_none() {
        let row = Row::new().with("id", 1);
        assert_eq!(resolve_path(&row, "doc->name"), None);
    }

    #[test]
    fn json_null_resolves_to_null_value() {
        let row = row_with_doc(r#"{"name":null}"#);
        assert_eq!(resolve_path(&row, "doc->name"), Some(FieldValue::Null));
    }

    #[test]
    fn nested_object_renders_compact() {
        let row = row_with_doc(r#"{"data":{"a":1}}"#);
        assert_eq!(
            resolve_path(&row, "doc->data"),
            Some(FieldValue::Text(r#"{"a":1}"#.into()))
        );
    }
}
