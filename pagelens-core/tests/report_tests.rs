// Tests for report generation functionality

use chrono::{TimeZone, Utc};
use pagelens_core::report::{
    AnalysisReport, ReportFormat, generate_json_report, generate_markdown_report,
    generate_text_report, render_report, save_report,
};
use pagelens_scanner::PageAnalysisResult;

fn sample_result() -> PageAnalysisResult {
    serde_json::from_str(
        r#"{
            "html_version": "4.01",
            "page_title": "Sign in | Example",
            "headings": {"h1": 1, "h2": 3},
            "internal_links_count": 4,
            "external_links_count": 2,
            "inaccessible_links_count": 1,
            "contains_login_form": true
        }"#,
    )
    .unwrap()
}

fn sample_report() -> AnalysisReport {
    AnalysisReport {
        url: "https://example.com/login".to_string(),
        analyzed_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
        result: sample_result(),
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str_text() {
    let format = ReportFormat::from_str("text");
    assert!(matches!(format, Some(ReportFormat::Text)));
}

#[test]
fn test_report_format_from_str_json() {
    let format = ReportFormat::from_str("json");
    assert!(matches!(format, Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_markdown() {
    assert!(matches!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown)));
    assert!(matches!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown)));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert!(matches!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json)));
    assert!(matches!(ReportFormat::from_str("Text"), Some(ReportFormat::Text)));
}

#[test]
fn test_report_format_from_str_unknown() {
    assert!(ReportFormat::from_str("csv").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_contains_summary() {
    let text = generate_text_report(&sample_report());

    assert!(text.contains("PAGELENS ANALYSIS REPORT"));
    assert!(text.contains("URL:           https://example.com/login"));
    assert!(text.contains("Analyzed:      2026-03-14 09:26:53 UTC"));
    assert!(text.contains("HTML Version:  4.01"));
    assert!(text.contains("Title:         Sign in | Example"));
    assert!(text.contains("Login Form:    yes"));
}

#[test]
fn test_text_report_lists_headings_in_order() {
    let text = generate_text_report(&sample_report());
    let h1 = text.find("  h1   1").unwrap();
    let h2 = text.find("  h2   3").unwrap();
    assert!(h1 < h2);
}

#[test]
fn test_text_report_link_counts() {
    let text = generate_text_report(&sample_report());
    assert!(text.contains("Internal:     4"));
    assert!(text.contains("External:     2"));
    assert!(text.contains("Inaccessible: 1"));
    assert!(text.contains("Total:        6"));
}

#[test]
fn test_text_report_empty_page() {
    let report = AnalysisReport::new("https://example.com/", PageAnalysisResult::default());
    let text = generate_text_report(&report);

    assert!(text.contains("HTML Version:  5.0"));
    assert!(text.contains("Title:         (none)"));
    assert!(text.contains("No headings found"));
    assert!(text.contains("Login Form:    no"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_is_the_serialized_result() {
    let result = sample_result();
    let json = generate_json_report(&result).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, serde_json::to_value(&result).unwrap());
    assert_eq!(value["html_version"], "4.01");
    assert_eq!(value["headings"]["h2"], 3);
    assert_eq!(value["contains_login_form"], true);
}

#[test]
fn test_render_report_dispatches_on_format() {
    let report = sample_report();

    let json = render_report(&report, ReportFormat::Json).unwrap();
    assert!(json.starts_with('{'));

    let md = render_report(&report, ReportFormat::Markdown).unwrap();
    assert!(md.starts_with("# Pagelens Analysis Report"));

    let text = render_report(&report, ReportFormat::Text).unwrap();
    assert!(text.contains("PAGELENS ANALYSIS REPORT"));
}

// ============================================================================
// Markdown Report Tests
// ============================================================================

#[test]
fn test_markdown_report_tables() {
    let md = generate_markdown_report(&sample_report());

    assert!(md.contains("| h1 | 1 |"));
    assert!(md.contains("| h2 | 3 |"));
    assert!(md.contains("| Internal | 4 |"));
    assert!(md.contains("| External | 2 |"));
    assert!(md.contains("| Inaccessible | 1 |"));
}

#[test]
fn test_markdown_report_escapes_title() {
    let md = generate_markdown_report(&sample_report());
    assert!(md.contains("- **Title:** Sign in \\| Example"));
}

#[test]
fn test_markdown_report_without_headings() {
    let report = AnalysisReport::new("https://example.com/", PageAnalysisResult::default());
    let md = generate_markdown_report(&report);
    assert!(md.contains("_No headings found._"));
}

// ============================================================================
// Save Report Tests
// ============================================================================

#[test]
fn test_save_report_writes_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.md");

    save_report("# hello\n", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
}

#[test]
fn test_save_report_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    save_report("first", &path).unwrap();
    save_report("second", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
}

#[test]
fn test_save_report_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.txt");
    assert!(save_report("content", &path).is_err());
}
