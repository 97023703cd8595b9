pub mod analyze;
pub mod api;
pub mod error;
pub mod fetch;
pub mod report;

pub use analyze::{AnalyzeOptions, AnalyzeProgressCallback, analyze_markup, analyze_url, execute_analysis};
pub use error::AnalysisError;
pub use fetch::{FetchedPage, build_client, fetch_page, parse_target_url};
pub use report::{AnalysisReport, ReportFormat};
