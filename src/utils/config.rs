//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default number of slowest calls listed in summaries
pub const DEFAULT_TOP_CALLS: usize = 10;

/// Upper bound accepted for `--top`
pub const MAX_TOP_CALLS: usize = 1000;

/// Deepest level printed by the text tree; deeper calls are summarized
pub const MAX_TEXT_DEPTH: usize = 64;

/// Label used when a session has no entry-point record
pub const UNKNOWN_ENTRY_LABEL: &str = "Unknown";

// Keys under which trace dumps wrap their record array
// (different exporters use different names)
pub const RECORD_FIELD_NAMES: &[&str] = &["entries", "records", "traces", "data", "logs"];
