//! TraceFlow CLI
//!
//! Turns captured method-invocation dumps into call trees,
//! with optional merging of repeated sibling calls.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use traceflow::commands::{
    display_schema, display_version, execute_view, list_sessions, validate_args,
    validate_view_file, ViewArgs,
};
use traceflow::output::Layout;
use traceflow::tree::ViewConfig;
use traceflow::utils::config::DEFAULT_TOP_CALLS;

/// TraceFlow - call trees from method traces
#[derive(Parser, Debug)]
#[command(name = "traceflow")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the call tree of one session and write a view document
    View {
        /// Trace dump (JSON array of records, or object wrapping one)
        #[arg(short, long)]
        input: PathBuf,

        /// Session id to display (defaults to the first session)
        #[arg(short, long)]
        session: Option<String>,

        /// Output path for the JSON view document
        #[arg(short, long, default_value = "view.json")]
        output: PathBuf,

        /// JSON file with {"includeAccessors": bool, "mergeDuplicates": bool}
        #[arg(short, long, env = "TRACEFLOW_CONFIG")]
        config: Option<PathBuf>,

        /// Collapse repeated sibling invocations
        #[arg(long)]
        merge: bool,

        /// Keep getter/setter calls in the view
        #[arg(long)]
        include_accessors: bool,

        /// Write flat re-linked records instead of a nested tree
        #[arg(long)]
        flat: bool,

        /// Number of slowest calls to include
        #[arg(long, default_value_t = DEFAULT_TOP_CALLS)]
        top: usize,

        /// Print text tree and summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// List sessions contained in a trace dump
    Sessions {
        /// Trace dump to inspect
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate a view JSON file
    Validate {
        /// Path to view JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::View {
            input,
            session,
            output,
            config,
            merge,
            include_accessors,
            flat,
            top,
            summary,
        } => {
            // Flags only ever switch options on over the config file
            let mut view_config = match config {
                Some(path) => load_view_config(&path)?,
                None => ViewConfig::default(),
            };
            view_config.merge_duplicates |= merge;
            view_config.include_accessors |= include_accessors;

            let args = ViewArgs {
                input,
                session,
                output_json: output,
                config: view_config,
                layout: if flat { Layout::Flat } else { Layout::Tree },
                top_calls: top,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_view(args)?;
        }

        Commands::Sessions { input } => {
            list_sessions(&input)?;
        }

        Commands::Validate { file } => {
            validate_view_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Load pipeline options from a JSON file
///
/// **Private** - internal helper for the view command
fn load_view_config(path: &Path) -> Result<ViewConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config {}", path.display()))?;

    let config: ViewConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid config {}", path.display()))?;

    log::debug!("Loaded view config: {:?}", config);

    Ok(config)
}
