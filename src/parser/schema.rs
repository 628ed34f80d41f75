//! Record schema for captured method invocations.
//!
//! Records travel as camelCase JSON. The wire shape (`RecordWire`) is
//! lenient about identifiers and optional fields; everything is resolved
//! once at ingestion into a `Record` so the tree engine never has to
//! second-guess a field.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Identifier of a record, unique within a session
pub type RecordId = String;

/// Category of an invoked method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodType {
    /// Method that opened the trace session
    EntryPoint,

    /// Ordinary business logic (also the default when the field is missing)
    #[default]
    Business,

    Getter,
    Setter,
    Error,

    /// Anything the capturing agent reported that we do not know about
    #[serde(other)]
    Other,
}

impl MethodType {
    /// Getters and setters are hidden from views unless explicitly requested
    pub fn is_accessor(self) -> bool {
        matches!(self, MethodType::Getter | MethodType::Setter)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MethodType::EntryPoint => "ENTRY_POINT",
            MethodType::Business => "BUSINESS",
            MethodType::Getter => "GETTER",
            MethodType::Setter => "SETTER",
            MethodType::Error => "ERROR",
            MethodType::Other => "OTHER",
        }
    }
}

/// Error raised by an invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    pub error_type: Option<String>,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
}

/// One captured method invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordWire", into = "RecordWire")]
pub struct Record {
    pub id: RecordId,

    /// Absent for root candidates
    pub parent_id: Option<RecordId>,

    pub session_id: Option<String>,
    pub class_name: String,
    pub method_name: String,
    pub method_type: MethodType,
    pub parameter_types: Vec<String>,
    pub return_type: String,

    /// Start timestamp (epoch millis as reported by the agent)
    pub start_time: i64,

    /// Elapsed time, same unit across the session
    pub duration: i64,

    pub is_async: bool,
    pub error: Option<ErrorInfo>,
}

impl Record {
    /// Create a record with the given identity; other fields take defaults
    pub fn new(
        id: impl Into<RecordId>,
        parent_id: Option<&str>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        duration: i64,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            session_id: None,
            class_name: class_name.into(),
            method_name: method_name.into(),
            method_type: MethodType::default(),
            parameter_types: Vec::new(),
            return_type: String::new(),
            start_time: 0,
            duration,
            is_async: false,
            error: None,
        }
    }

    pub fn with_method_type(mut self, method_type: MethodType) -> Self {
        self.method_type = method_type;
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }

    pub fn is_accessor(&self) -> bool {
        self.method_type.is_accessor()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// `SimpleClassName.method`, as shown in session lists
    pub fn short_label(&self) -> String {
        let simple_class = self
            .class_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.class_name);
        format!("{}.{}", simple_class, self.method_name)
    }
}

/// On-the-wire shape of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWire {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RecordId,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub parent_id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub class_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub method_name: String,

    #[serde(default)]
    pub method_type: Option<MethodType>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub parameter_types: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub return_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: i64,

    #[serde(default, rename = "async", deserialize_with = "null_as_default")]
    pub is_async: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl From<RecordWire> for Record {
    fn from(wire: RecordWire) -> Self {
        let has_details =
            wire.error_type.is_some() || wire.error_message.is_some() || wire.stack_trace.is_some();

        let error = (wire.error || has_details).then(|| ErrorInfo {
            error_type: wire.error_type,
            message: wire.error_message,
            stack_trace: wire.stack_trace,
        });

        Record {
            id: wire.id,
            parent_id: wire.parent_id,
            session_id: wire.session_id,
            class_name: wire.class_name,
            method_name: wire.method_name,
            method_type: wire.method_type.unwrap_or_default(),
            parameter_types: wire.parameter_types,
            return_type: wire.return_type,
            start_time: wire.start_time,
            duration: wire.duration,
            is_async: wire.is_async,
            error,
        }
    }
}

impl From<Record> for RecordWire {
    fn from(record: Record) -> Self {
        let error = record.error.is_some();
        let details = record.error.unwrap_or_default();

        RecordWire {
            id: record.id,
            parent_id: record.parent_id,
            session_id: record.session_id,
            class_name: record.class_name,
            method_name: record.method_name,
            method_type: Some(record.method_type),
            parameter_types: record.parameter_types,
            return_type: record.return_type,
            start_time: record.start_time,
            duration: record.duration,
            is_async: record.is_async,
            error,
            error_type: details.error_type,
            error_message: details.message,
            stack_trace: details.stack_trace,
        }
    }
}

/// Identifiers arrive as strings from the Java agent but as numbers from
/// hand-written fixtures; both map to the same text form.
fn id_from_value<E: de::Error>(value: serde_json::Value) -> Result<Option<RecordId>, E> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.is_empty() => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(E::custom(format!(
            "identifier must be a string or number, got {}",
            other
        ))),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)?.ok_or_else(|| de::Error::custom("record id must not be empty"))
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_nulls_accepted() {
        let record: Record = serde_json::from_value(json!({
            "id": "7",
            "parentId": null,
            "className": null,
            "methodName": "run",
            "parameterTypes": null,
            "returnType": null,
            "duration": null,
            "async": null,
            "error": null
        }))
        .unwrap();

        assert_eq!(record.class_name, "");
        assert_eq!(record.method_name, "run");
        assert!(record.parameter_types.is_empty());
        assert_eq!(record.return_type, "");
        assert_eq!(record.duration, 0);
        assert!(!record.has_error());
    }

    #[test]
    fn test_numeric_ids_become_text() {
        let record: Record = serde_json::from_value(json!({
            "id": 2,
            "parentId": 1,
            "className": "A",
            "methodName": "get",
            "duration": 3
        }))
        .unwrap();

        assert_eq!(record.id, "2");
        assert_eq!(record.parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_missing_method_type_defaults_to_business() {
        let record: Record =
            serde_json::from_value(json!({"id": "a", "className": "Foo", "methodName": "bar"}))
                .unwrap();

        assert_eq!(record.method_type, MethodType::Business);
        assert!(record.parent_id.is_none());
        assert!(!record.has_error());
    }

    #[test]
    fn test_unknown_method_type_is_other() {
        let record: Record =
            serde_json::from_value(json!({"id": "a", "methodType": "CONSTRUCTOR"})).unwrap();
        assert_eq!(record.method_type, MethodType::Other);
    }

    #[test]
    fn test_empty_parent_is_absent() {
        let record: Record = serde_json::from_value(json!({"id": "a", "parentId": ""})).unwrap();
        assert!(record.parent_id.is_none());
    }

    #[test]
    fn test_error_payload() {
        let record: Record = serde_json::from_value(json!({
            "id": "a",
            "error": true,
            "errorType": "java.lang.IllegalStateException",
            "errorMessage": "boom"
        }))
        .unwrap();

        let error = record.error.unwrap();
        assert_eq!(error.error_type.as_deref(), Some("java.lang.IllegalStateException"));
        assert_eq!(error.message.as_deref(), Some("boom"));
        assert!(error.stack_trace.is_none());
    }

    #[test]
    fn test_serialize_camel_case() {
        let record = Record::new("1", None, "com.example.Foo", "bar", 5)
            .with_method_type(MethodType::EntryPoint);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["methodType"], "ENTRY_POINT");
        assert_eq!(value["className"], "com.example.Foo");
        assert_eq!(value["parentId"], serde_json::Value::Null);
        assert_eq!(value["async"], false);
        assert_eq!(value["error"], false);
    }

    #[test]
    fn test_object_id_rejected() {
        let result: Result<Record, _> = serde_json::from_value(json!({"id": {"x": 1}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_short_label() {
        let record = Record::new("1", None, "com.example.OrderService", "place", 0);
        assert_eq!(record.short_label(), "OrderService.place");
    }
}
