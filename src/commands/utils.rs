use crate::output::read_view;
use crate::parser::{read_records, split_sessions};
use crate::tree::{summarize_session, SessionSummary};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Summaries of every session in a trace dump, in first-seen order
pub fn collect_sessions(input: &Path) -> Result<Vec<SessionSummary>> {
    let records = read_records(input)
        .with_context(|| format!("Failed to read trace dump {}", input.display()))?;

    Ok(split_sessions(records)
        .iter()
        .map(|s| summarize_session(&s.id, &s.records))
        .collect())
}

/// List the sessions contained in a trace dump
pub fn list_sessions(input: &Path) -> Result<()> {
    let sessions = collect_sessions(input)?;

    println!("Sessions in {}: {}", input.display(), sessions.len());

    for summary in &sessions {
        println!(
            "  {:<38} {:<40} {:>6} calls  {:>4} accessors  {:>4} errors{}",
            if summary.session_id.is_empty() { "(none)" } else { summary.session_id.as_str() },
            summary.entry_method,
            summary.record_count,
            summary.accessor_count,
            summary.error_count,
            if summary.root_count > 1 {
                format!("  ({} roots)", summary.root_count)
            } else {
                String::new()
            }
        );
    }

    Ok(())
}

/// Validate a view JSON file
pub fn validate_view_file(file_path: &Path) -> Result<()> {
    println!("Validating view: {}", file_path.display());

    let document = read_view(file_path)?;

    println!("✓ Valid view JSON");
    println!("  Version: {}", document.version);
    println!("  Session: {}", document.summary.session_id);
    println!("  Entry: {}", document.summary.entry_method);
    println!("  Merge duplicates: {}", document.config.merge_duplicates);
    println!("  Include accessors: {}", document.config.include_accessors);
    println!("  {}", document.filter_stats.summary());
    if let Some(stats) = &document.stats {
        println!("  Depth: {}", stats.max_depth);
        println!("  Aggregates: {}", stats.merged_nodes);
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("TraceFlow View Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generatedAt: string      - RFC 3339 timestamp");
        println!("  config: object           - includeAccessors, mergeDuplicates");
        println!("  summary: object          - Session id, entry method, counts");
        println!("  filterStats: object      - showing / total / accessors");
        println!("  stats: object?           - Node count, depth, aggregates");
        println!("  slowestCalls: array      - Calls ranked by total duration");
        println!("  tree: array?             - Re-linked records of the call tree");
        println!("  records: array?          - Flat re-linked records");
        println!("    mergedIds: array       - Every record id absorbed by the node");
        println!("    mergedCount: number    - Size of mergedIds");
        println!("    totalDuration: number  - Sum of absorbed durations");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("TraceFlow v{}", env!("CARGO_PKG_VERSION"));
    println!("View Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call-tree reconstruction and duplicate merging for method traces.");
}
