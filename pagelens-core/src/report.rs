// Report generation from an analysis result

use chrono::{DateTime, Utc};
use pagelens_scanner::PageAnalysisResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

/// An analysis result together with what was analyzed and when.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub url: String,
    pub analyzed_at: DateTime<Utc>,
    pub result: PageAnalysisResult,
}

impl AnalysisReport {
    pub fn new(url: impl Into<String>, result: PageAnalysisResult) -> Self {
        Self {
            url: url.into(),
            analyzed_at: Utc::now(),
            result,
        }
    }

    fn title_or_placeholder(&self) -> &str {
        let title = self.result.page_title();
        if title.is_empty() { "(none)" } else { title }
    }

    fn format_timestamp(&self) -> String {
        self.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

pub fn generate_text_report(report: &AnalysisReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    // Header
    out.push_str(RULE);
    out.push_str("                          PAGELENS ANALYSIS REPORT\n");
    out.push_str(RULE);
    out.push('\n');

    out.push_str(&format!("URL:           {}\n", report.url));
    out.push_str(&format!("Analyzed:      {}\n", report.format_timestamp()));
    out.push_str(&format!("HTML Version:  {}\n", result.html_version()));
    out.push_str(&format!("Title:         {}\n", report.title_or_placeholder()));
    out.push_str(&format!(
        "Login Form:    {}\n",
        if result.contains_login_form() { "yes" } else { "no" }
    ));
    out.push('\n');

    out.push_str(RULE);
    out.push_str("HEADINGS\n");
    out.push_str(RULE);
    out.push('\n');

    if result.headings().is_empty() {
        out.push_str("  No headings found\n");
    } else {
        for (tag, count) in result.headings() {
            out.push_str(&format!("  {:<4} {}\n", tag, count));
        }
    }
    out.push('\n');

    out.push_str(RULE);
    out.push_str("LINKS\n");
    out.push_str(RULE);
    out.push('\n');

    out.push_str(&format!("  Internal:     {}\n", result.internal_links_count()));
    out.push_str(&format!("  External:     {}\n", result.external_links_count()));
    out.push_str(&format!("  Inaccessible: {}\n", result.inaccessible_links_count()));
    out.push_str(&format!("  Total:        {}\n", result.total_links()));
    out.push('\n');

    // Footer
    out.push_str(RULE);
    out.push_str("\nGenerated by Pagelens\n\n");

    out
}

/// The JSON report is the serialised result, identical to the API payload.
pub fn generate_json_report(result: &PageAnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let result = &report.result;
    let mut md = String::new();

    md.push_str("# Pagelens Analysis Report\n\n");
    md.push_str(&format!("- **URL:** {}\n", report.url));
    md.push_str(&format!("- **Analyzed:** {}\n", report.format_timestamp()));
    md.push_str(&format!("- **HTML version:** {}\n", result.html_version()));
    md.push_str(&format!("- **Title:** {}\n", escape_markdown(report.title_or_placeholder())));
    md.push_str(&format!(
        "- **Login form:** {}\n\n",
        if result.contains_login_form() { "yes" } else { "no" }
    ));

    md.push_str("## Headings\n\n");
    if result.headings().is_empty() {
        md.push_str("_No headings found._\n\n");
    } else {
        md.push_str("| Tag | Count |\n|-----|-------|\n");
        for (tag, count) in result.headings() {
            md.push_str(&format!("| {} | {} |\n", tag, count));
        }
        md.push('\n');
    }

    md.push_str("## Links\n\n");
    md.push_str("| Kind | Count |\n|------|-------|\n");
    md.push_str(&format!("| Internal | {} |\n", result.internal_links_count()));
    md.push_str(&format!("| External | {} |\n", result.external_links_count()));
    md.push_str(&format!("| Inaccessible | {} |\n", result.inaccessible_links_count()));
    md.push('\n');

    md
}

/// Render `report` in `format`.
pub fn render_report(report: &AnalysisReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(&report.result),
        ReportFormat::Markdown => Ok(generate_markdown_report(report)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '|' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
