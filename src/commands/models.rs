use crate::output::Layout;
use crate::tree::ViewConfig;
use crate::utils::config::DEFAULT_TOP_CALLS;
use std::path::PathBuf;

/// Arguments for the view command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ViewArgs {
    /// Trace dump to read
    pub input: PathBuf,

    /// Session to display (None = first session in the dump)
    pub session: Option<String>,

    /// Output path for the JSON view document
    pub output_json: PathBuf,

    /// Pipeline options
    pub config: ViewConfig,

    /// Nested tree or flat re-linked records
    pub layout: Layout,

    /// Number of slowest calls to include
    pub top_calls: usize,

    /// Print text tree and summary to stdout
    pub print_summary: bool,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.json"),
            session: None,
            output_json: PathBuf::from("view.json"),
            config: ViewConfig::default(),
            layout: Layout::Tree,
            top_calls: DEFAULT_TOP_CALLS,
            print_summary: false,
        }
    }
}
