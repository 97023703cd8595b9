pub mod analyzer;
pub mod error;
pub mod prober;
pub mod resolver;
pub mod result;
pub mod walker;

pub use analyzer::PageAnalyzer;
pub use error::ScanError;
pub use prober::{ProbeConfig, ProbeProgressCallback, ReachabilityProber};
pub use resolver::{BaseUrl, LinkKind, LinkRecord};
pub use result::{HtmlVersion, PageAnalysisResult};
