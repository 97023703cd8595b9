use crate::error::AnalysisError;
use crate::fetch::{build_client, fetch_page};
use indicatif::{ProgressBar, ProgressStyle};
use pagelens_scanner::prober::{DEFAULT_CONCURRENCY, DEFAULT_DEADLINE, DEFAULT_PROBE_TIMEOUT};
use pagelens_scanner::{BaseUrl, PageAnalysisResult, PageAnalyzer, ProbeConfig, ProbeProgressCallback};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Options for configuring an analysis
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub url: String,
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub deadline: Duration,
    pub show_progress_bars: bool,
}

impl AnalyzeOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig::default()
            .with_concurrency(self.concurrency)
            .with_probe_timeout(self.probe_timeout)
            .with_deadline(self.deadline)
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            deadline: DEFAULT_DEADLINE,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting analysis progress
pub type AnalyzeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Fetch a page and analyze it. The fetched page's final URL is the base
/// for resolving its links.
pub async fn analyze_url(
    client: &Client,
    analyzer: &PageAnalyzer,
    raw_url: &str,
) -> Result<PageAnalysisResult, AnalysisError> {
    let page = fetch_page(client, raw_url).await?;
    let base = BaseUrl::try_from(page.url)?;
    Ok(analyzer.analyze(&page.body, &base).await?)
}

/// Execute an analysis of `options.url`
pub async fn execute_analysis(
    options: AnalyzeOptions,
    progress_callback: Option<AnalyzeProgressCallback>,
) -> Result<PageAnalysisResult, AnalysisError> {
    let client = build_client(options.probe_timeout)?;

    if let Some(ref callback) = progress_callback {
        callback(format!("Fetching {}", options.url.trim()));
    }
    let page = fetch_page(&client, &options.url).await?;
    let base = BaseUrl::try_from(page.url)?;

    run_analysis(&page.body, &base, &options, progress_callback).await
}

/// Analyze a document that was obtained elsewhere, e.g. read from disk
pub async fn analyze_markup(
    markup: &str,
    base_url: &str,
    options: &AnalyzeOptions,
    progress_callback: Option<AnalyzeProgressCallback>,
) -> Result<PageAnalysisResult, AnalysisError> {
    let base = BaseUrl::parse(base_url)?;
    run_analysis(markup, &base, options, progress_callback).await
}

async fn run_analysis(
    markup: &str,
    base: &BaseUrl,
    options: &AnalyzeOptions,
    progress_callback: Option<AnalyzeProgressCallback>,
) -> Result<PageAnalysisResult, AnalysisError> {
    // Single spinner for the probing phase (only if enabled)
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Analyzing document...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut analyzer = PageAnalyzer::with_config(options.probe_config())?;
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let probe_progress: ProbeProgressCallback = Arc::new(move |done: usize, total: usize| {
            pb_clone.set_message(format!("Probing links... {}/{}", done, total));
            pb_clone.tick();
        });
        analyzer = analyzer.with_progress_callback(probe_progress);
    }

    let result = analyzer.analyze(markup, base).await;

    if let Some(ref pb) = progress_bar {
        match result {
            Ok(ref r) => pb.finish_with_message(format!(
                "Analysis complete! {} links probed",
                r.total_links()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    let result = result?;
    info!(
        "{}: {} internal, {} external, {} inaccessible",
        base,
        result.internal_links_count(),
        result.external_links_count(),
        result.inaccessible_links_count()
    );

    if let Some(ref callback) = progress_callback {
        callback(format!(
            "Analyzed {}: {} links, {} inaccessible",
            base,
            result.total_links(),
            result.inaccessible_links_count()
        ));
    }

    Ok(result)
}
