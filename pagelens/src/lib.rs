pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    init_logging, load_markup_from_file, options_from_matches, report_format_from_matches,
    resolve_output_path,
};

pub use pagelens_core::analyze::{AnalyzeOptions, AnalyzeProgressCallback, execute_analysis};
