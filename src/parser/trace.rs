//! Trace dump parser.
//!
//! Accepts the JSON produced by the capturing agent's `/logs` endpoint:
//! either a bare array of records, or an object wrapping that array
//! under one of the known keys.

use super::schema::Record;
use crate::utils::config::RECORD_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse records from a raw JSON trace dump
///
/// **Public** - main entry point for ingestion
///
/// # Errors
/// * `ParseError::InvalidFormat` - not an array / no known wrapper key,
///   or a record that cannot be deserialized
pub fn parse_records(raw: &serde_json::Value) -> Result<Vec<Record>, ParseError> {
    let items = extract_record_array(raw)?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = Record::deserialize(item)
            .map_err(|e| ParseError::InvalidFormat(format!("record #{}: {}", index, e)))?;

        if record.duration < 0 {
            // Summed as-is by the merge engine
            warn!("Record {} has negative duration {}", record.id, record.duration);
        }

        records.push(record);
    }

    debug!("Parsed {} records", records.len());

    Ok(records)
}

/// Read and parse a trace dump from disk
///
/// **Public** - used by the CLI commands
pub fn read_records(input_path: impl AsRef<Path>) -> Result<Vec<Record>, ParseError> {
    let input_path = input_path.as_ref();

    debug!("Reading trace dump from: {}", input_path.display());

    let file = File::open(input_path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_records(&raw)
}

/// Locate the record array inside the dump
///
/// **Private** - internal helper for parse_records
fn extract_record_array(raw: &serde_json::Value) -> Result<&Vec<serde_json::Value>, ParseError> {
    match raw {
        serde_json::Value::Array(items) => Ok(items),

        serde_json::Value::Object(obj) => RECORD_FIELD_NAMES
            .iter()
            .find_map(|field| obj.get(*field).and_then(|v| v.as_array()))
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "no record array found (expected one of: {})",
                    RECORD_FIELD_NAMES.join(", ")
                ))
            }),

        _ => Err(ParseError::InvalidFormat(
            "Trace must be a JSON array or object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_array() {
        let raw = json!([
            {"id": "1", "className": "Foo", "methodName": "bar"},
            {"id": "2", "parentId": "1", "className": "Foo", "methodName": "baz"}
        ]);

        let records = parse_records(&raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_wrapped_array() {
        let raw = json!({"entries": [{"id": 7}]});
        let records = parse_records(&raw).unwrap();
        assert_eq!(records[0].id, "7");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_records(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_root() {
        assert!(matches!(
            parse_records(&json!("nope")),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(parse_records(&json!({"other": []})).is_err());
    }

    #[test]
    fn test_parse_bad_record_reports_index() {
        let err = parse_records(&json!([{"id": "1"}, {"className": "NoId"}])).unwrap_err();
        assert!(err.to_string().contains("record #1"));
    }
}
