//! View command implementation.
//!
//! The view command:
//! 1. Reads the trace dump
//! 2. Selects one session
//! 3. Builds, merges and filters the call tree
//! 4. Writes the view document

use super::models::ViewArgs;
use crate::output::{render_slowest_calls, render_tree, to_document, validate_path, write_view};
use crate::parser::{read_records, split_sessions, Session};
use crate::tree::{prepare_view, summarize_session};
use crate::utils::config::MAX_TOP_CALLS;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the view command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace dump unreadable or malformed
/// * Requested session not present
/// * File write errors
pub fn execute_view(args: ViewArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Reading trace dump: {}", args.input.display());

    // Step 1: Read records
    info!("Step 1/4: Parsing trace records...");
    let records = read_records(&args.input)
        .with_context(|| format!("Failed to read trace dump {}", args.input.display()))?;

    // Step 2: Pick the session
    info!("Step 2/4: Selecting session...");
    let session = select_session(split_sessions(records), args.session.as_deref())?;

    let summary = summarize_session(&session.id, &session.records);
    info!(
        "Session {}: {} ({} records)",
        display_session_id(&session.id),
        summary.entry_method,
        summary.record_count
    );

    if summary.root_count > 1 {
        warn!(
            "{} root candidates found, only the first is shown",
            summary.root_count
        );
    }

    // Step 3: Build the view
    info!(
        "Step 3/4: Building call tree (merge={}, accessors={})...",
        args.config.merge_duplicates, args.config.include_accessors
    );
    let view = prepare_view(session.records, &args.config);

    info!("{}", view.filter_stats.summary());

    let document = to_document(summary, view, args.config, args.layout, args.top_calls);

    debug!("Slowest calls:");
    for (i, call) in document.slowest_calls.iter().take(3).enumerate() {
        debug!(
            "  {}. {} ms ({:.1}%): {}",
            i + 1,
            call.duration,
            call.percentage,
            call.label
        );
    }

    // Step 4: Write output
    info!("Step 4/4: Writing view document...");
    write_view(&document, &args.output_json).context("Failed to write view JSON")?;

    info!("✓ View written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("CALL TREE");
        println!("{}", "=".repeat(80));
        println!("Session: {}", display_session_id(&document.summary.session_id));
        println!("Entry:   {}", document.summary.entry_method);
        println!("{}", document.filter_stats.summary());

        match &document.tree {
            Some(root) => println!("\n{}", render_tree(root)),
            None if document.records.is_some() => {}
            None => println!("\nNo data available"),
        }

        println!("\n{}", render_slowest_calls(&document.slowest_calls));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("View completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Pick the requested session, or the first one in the dump
///
/// **Private** - internal helper for execute_view
///
/// An empty dump yields an empty session, which renders as an empty view.
fn select_session(sessions: Vec<Session>, wanted: Option<&str>) -> Result<Session> {
    match wanted {
        Some(id) => sessions
            .into_iter()
            .find(|s| s.id == id)
            .with_context(|| format!("Session {} not found in trace dump", id)),
        None => Ok(sessions.into_iter().next().unwrap_or_else(|| {
            warn!("Trace dump contains no records");
            Session::default()
        })),
    }
}

fn display_session_id(id: &str) -> &str {
    if id.is_empty() {
        "(none)"
    } else {
        id
    }
}

/// Validate view arguments
///
/// **Public** - can be called before execute_view for early validation
pub fn validate_args(args: &ViewArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    validate_path(&args.output_json).context("Invalid output path")?;

    if let Some(session) = &args.session {
        if session.trim().is_empty() {
            anyhow::bail!("Session id cannot be blank");
        }
    }

    if args.top_calls > MAX_TOP_CALLS {
        anyhow::bail!("top is too large (max {})", MAX_TOP_CALLS);
    }

    Ok(())
}
