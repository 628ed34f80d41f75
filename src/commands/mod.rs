//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod utils;
pub mod view;

// Re-export main command functions
pub use models::ViewArgs;
pub use utils::{collect_sessions, display_schema, display_version, list_sessions, validate_view_file};
pub use view::{execute_view, validate_args};
