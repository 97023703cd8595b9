use crate::error::{Result, ScanError};
use crate::prober::{ProbeConfig, ProbeProgressCallback, ReachabilityProber};
use crate::resolver::BaseUrl;
use crate::result::PageAnalysisResult;
use crate::walker::walk_markup;
use std::io::Read;
use tracing::{debug, info};

/// Runs the three analysis phases: walk and resolve, probe, assemble.
pub struct PageAnalyzer {
    prober: ReachabilityProber,
}

impl PageAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_config(ProbeConfig::default())
    }

    pub fn with_config(config: ProbeConfig) -> Result<Self> {
        Ok(Self {
            prober: ReachabilityProber::new(config)?,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProbeProgressCallback) -> Self {
        self.prober = self.prober.with_progress_callback(callback);
        self
    }

    pub fn probe_config(&self) -> &ProbeConfig {
        self.prober.config()
    }

    /// Analyze an already decoded document fetched from `base`.
    pub async fn analyze(&self, markup: &str, base: &BaseUrl) -> Result<PageAnalysisResult> {
        info!("Analyzing {} ({} bytes)", base, markup.len());

        let state = walk_markup(markup, base);
        debug!(
            "Extracted title {:?}, version {}, {} links",
            state.title(),
            state.html_version(),
            state.links().len()
        );

        let inaccessible = self.prober.probe(&state.resolved_urls()).await;

        Ok(PageAnalysisResult::assemble(state, inaccessible))
    }

    /// Analyze a markup stream. The base URL is validated before anything is
    /// read; bytes that are not valid UTF-8 are replaced.
    pub async fn analyze_reader<R: Read>(
        &self,
        mut reader: R,
        base: &str,
    ) -> Result<PageAnalysisResult> {
        let base = BaseUrl::parse(base)?;

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ScanError::Parse(format!("Failed to read markup: {}", e)))?;
        let markup = String::from_utf8_lossy(&bytes).into_owned();
        drop(reader);

        self.analyze(&markup, &base).await
    }
}
