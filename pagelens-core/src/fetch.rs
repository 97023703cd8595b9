// Initial page fetch: the document every analysis starts from

use crate::error::AnalysisError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A fetched document and the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    /// Missing content types are assumed to be HTML.
    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().is_none_or(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("text/html")
                || mime.eq_ignore_ascii_case("application/xhtml+xml")
        })
    }
}

pub fn build_client(timeout: Duration) -> Result<Client, AnalysisError> {
    let client = Client::builder()
        .user_agent(concat!(
            "Pagelens/",
            env!("CARGO_PKG_VERSION"),
            " (https://github.com/trapdoorsec/pagelens)"
        ))
        .timeout(timeout)
        .connect_timeout(timeout / 2)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Validate a user supplied target: non-empty, absolute, http(s), with a host.
pub fn parse_target_url(raw: &str) -> Result<Url, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::MissingUrl);
    }

    let url = Url::parse(trimmed)
        .map_err(|e| AnalysisError::InvalidUrl(format!("'{}': {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AnalysisError::InvalidUrl(format!(
            "'{}': unsupported scheme {}",
            trimmed,
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AnalysisError::InvalidUrl(format!("'{}': missing host", trimmed)));
    }

    Ok(url)
}

/// Fetch the page to analyze. Anything but a 200 is an error.
pub async fn fetch_page(client: &Client, raw_url: &str) -> Result<FetchedPage, AnalysisError> {
    let url = parse_target_url(raw_url)?;
    debug!("Fetching {}", url);

    let response = client.get(url).send().await?;

    let status_code = response.status().as_u16();
    if status_code != 200 {
        return Err(AnalysisError::UnexpectedStatus(status_code));
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let body = response.text().await?;
    debug!("Fetched {} ({} bytes)", final_url, body.len());

    let page = FetchedPage {
        url: final_url,
        content_type,
        body,
    };
    if !page.is_html() {
        warn!(
            "{} is served as {}, analyzing it as HTML anyway",
            page.url,
            page.content_type.as_deref().unwrap_or_default()
        );
    }

    Ok(page)
}
