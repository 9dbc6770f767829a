// 📂 Input Reader - Spreadsheet-derived JSON rows
// Both inputs are an array of arrays; row 0 is the header

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a JSON document and return its rows (header included).
///
/// Missing file, unreadable file, malformed JSON or a top level that is
/// not an array are all fatal.
pub fn load_rows(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {:?}", path))?;

    parse_rows(&content).with_context(|| format!("Failed to parse input file: {:?}", path))
}

/// Parse already-loaded JSON text into rows
pub fn parse_rows(content: &str) -> Result<Vec<Value>> {
    let document: Value = serde_json::from_str(content).context("Invalid JSON")?;

    match document {
        Value::Array(rows) => Ok(rows),
        other => bail!("Expected a JSON array of rows, found {}", json_kind(&other)),
    }
}

/// Rows after the header
pub fn data_rows(rows: &[Value]) -> &[Value] {
    rows.get(1..).unwrap_or(&[])
}

/// Positional fields of a row; non-array rows have none
pub fn row_fields(row: &Value) -> &[Value] {
    match row {
        Value::Array(fields) => fields,
        _ => &[],
    }
}

/// Text of the field at `index`, `None` when absent or null
pub fn field_text(fields: &[Value], index: usize) -> Option<String> {
    fields.get(index).and_then(cell_text)
}

/// Text form of a single JSON cell
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested => Some(nested.to_string()),
    }
}

/// Required cells must exist and be non-empty
pub fn is_present(value: Option<&str>) -> bool {
    matches!(value, Some(text) if !text.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_rows_keeps_header() {
        let rows = parse_rows(r#"[["h1","h2"],["a","b"]]"#).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(data_rows(&rows).len(), 1);
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        let err = parse_rows(r#"{"rows": []}"#).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_rows_rejects_malformed_json() {
        assert!(parse_rows("[[\"a\",").is_err());
    }

    #[test]
    fn test_data_rows_of_empty_document() {
        let rows: Vec<Value> = Vec::new();
        assert!(data_rows(&rows).is_empty());
    }

    #[test]
    fn test_row_fields_of_non_array_row() {
        assert!(row_fields(&Value::Null).is_empty());
        assert!(row_fields(&json!("text")).is_empty());
        assert_eq!(row_fields(&json!(["a", null])).len(), 2);
    }

    #[test]
    fn test_field_text_conversions() {
        let fields = vec![json!("a"), Value::Null, json!(3), json!(false)];

        assert_eq!(field_text(&fields, 0), Some("a".to_string()));
        assert_eq!(field_text(&fields, 1), None);
        assert_eq!(field_text(&fields, 2), Some("3".to_string()));
        assert_eq!(field_text(&fields, 3), Some("false".to_string()));
        assert_eq!(field_text(&fields, 9), None);
    }

    #[test]
    fn test_is_present() {
        assert!(is_present(Some("Food")));
        assert!(is_present(Some(" ")));
        assert!(!is_present(Some("")));
        assert!(!is_present(None));
    }

    #[test]
    fn test_load_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["header"],["row"]]"#).unwrap();

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_load_rows_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rows(&dir.path().join("missing.json")).unwrap_err();

        assert!(err.to_string().contains("Failed to read input file"));
    }
}
