use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use pagelens_core::analyze::{AnalyzeOptions, AnalyzeProgressCallback, analyze_markup, execute_analysis};
use pagelens_core::api;
use pagelens_core::report::{AnalysisReport, ReportFormat, render_report, save_report};
use pagelens_scanner::PageAnalysisResult;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

use crate::commands::DEFAULT_LISTEN_ADDR;

const BANNER: &str = r#"
   ___  ___ ____ ____ / /__ ___  ___
  / _ \/ _ `/ _ `/ -_) / -_) _ \(_-<
 / .__/\_,_/\_, /\__/_/\__/_//_/___/
/_/        /___/
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "pagelens".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}

/// Install the stderr fmt subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

// Helper functions for the analyze handler

/// Map the shared probe arguments onto analysis options
pub fn options_from_matches(args: &ArgMatches) -> AnalyzeOptions {
    let defaults = AnalyzeOptions::default();

    AnalyzeOptions {
        url: args
            .try_get_one::<String>("url")
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_default(),
        concurrency: args
            .get_one::<usize>("concurrency")
            .copied()
            .unwrap_or(defaults.concurrency),
        probe_timeout: args
            .get_one::<u64>("timeout")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(defaults.probe_timeout),
        deadline: args
            .get_one::<u64>("deadline")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(defaults.deadline),
        show_progress_bars: false,
    }
}

/// Expand `~` and environment variables in a user supplied output path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned());
    PathBuf::from(expanded)
}

/// Read a local HTML document. Invalid UTF-8 is replaced rather than rejected.
pub fn load_markup_from_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read HTML file {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn report_format_from_matches(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

pub async fn handle_analyze(args: &ArgMatches, quiet: bool) -> Result<()> {
    let mut options = options_from_matches(args);
    options.show_progress_bars = !quiet;
    let format = report_format_from_matches(args);
    let output = args.get_one::<String>("output").map(|p| resolve_output_path(p));

    let progress_callback: Option<AnalyzeProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            eprintln!("{} {}", "→".blue(), msg);
        }))
    };

    let (target, result) = if let Some(file) = args.get_one::<PathBuf>("file") {
        let base_url = args
            .get_one::<String>("base-url")
            .context("--base-url is required with --file")?;
        let markup = load_markup_from_file(file)?;
        let result = analyze_markup(&markup, base_url, &options, progress_callback).await?;
        (base_url.clone(), result)
    } else {
        let target = options.url.trim().to_string();
        let result = execute_analysis(options, progress_callback).await?;
        (target, result)
    };

    let report = AnalysisReport::new(target, result);

    match output {
        Some(path) => {
            let content = render_report(&report, format)?;
            save_report(&content, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None if format == ReportFormat::Text && !quiet => print_summary(&report),
        None => print!("{}", render_report(&report, format)?),
    }

    Ok(())
}

pub async fn handle_serve(args: &ArgMatches) -> Result<()> {
    let options = options_from_matches(args);
    let listen = args
        .get_one::<String>("listen")
        .map(String::as_str)
        .unwrap_or(DEFAULT_LISTEN_ADDR);

    if listen.trim().is_empty() {
        bail!("Listen address must not be empty");
    }

    println!(
        "{} Serving on {}  (concurrency {}, timeout {}s, deadline {}s)",
        "→".blue(),
        format!("http://{}/api/v1", listen).bright_white(),
        options.concurrency,
        options.probe_timeout.as_secs(),
        options.deadline.as_secs()
    );

    api::serve(listen, &options).await
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_summary(report: &AnalysisReport) {
    let result: &PageAnalysisResult = &report.result;

    println!();
    print_divider();
    println!("{}", "  PAGE ANALYSIS".bright_white().bold());
    print_divider();
    println!();

    println!("{} URL:          {}", "→".blue(), report.url.bright_white());
    println!("{} HTML version: {}", "→".blue(), result.html_version());
    let title = if result.page_title().is_empty() {
        "(none)".dimmed().to_string()
    } else {
        result.page_title().bright_white().to_string()
    };
    println!("{} Title:        {}", "→".blue(), title);
    println!(
        "{} Login form:   {}",
        "→".blue(),
        if result.contains_login_form() { "yes".yellow().bold() } else { "no".normal() }
    );

    println!();
    println!("{}", "Headings".bright_white().bold());
    if result.headings().is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (tag, count) in result.headings() {
        println!("  {} {:<3} {}", "•".cyan(), tag, count);
    }

    println!();
    println!("{}", "Links".bright_white().bold());
    println!("  {} internal     {}", "•".cyan(), result.internal_links_count());
    println!("  {} external     {}", "•".cyan(), result.external_links_count());
    let inaccessible = result.inaccessible_links_count();
    if inaccessible > 0 {
        println!(
            "  {} inaccessible {}",
            "✗".red().bold(),
            inaccessible.to_string().red().bold()
        );
    } else {
        println!("  {} inaccessible {}", "✓".green().bold(), inaccessible);
    }
    println!();
}
