use crate::error::{Result, ScanError};
use std::fmt;
use url::Url;

/// The page a document was fetched from. Always carries a scheme and a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ScanError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;
        Self::try_from(url)
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Host plus an explicit non-default port, e.g. `localhost:8080`.
    pub fn authority(&self) -> String {
        let host = self.0.host_str().unwrap_or_default();
        match self.0.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

impl TryFrom<Url> for BaseUrl {
    type Error = ScanError;

    fn try_from(url: Url) -> Result<Self> {
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self(url)),
            _ => Err(ScanError::InvalidBaseUrl(format!("{} has no host", url))),
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// No scheme; resolved against the page it appeared on
    Internal,
    /// Carries its own scheme; used verbatim
    External,
}

/// A hyperlink discovered in a document, classified and resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    raw_href: String,
    kind: LinkKind,
    resolved_url: String,
}

impl LinkRecord {
    pub fn raw_href(&self) -> &str {
        &self.raw_href
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn resolved_url(&self) -> &str {
        &self.resolved_url
    }

    pub fn is_internal(&self) -> bool {
        self.kind == LinkKind::Internal
    }
}

/// Classify an href and compute the URL a probe should hit.
pub fn classify(raw_href: &str, base: &BaseUrl) -> LinkRecord {
    if is_external(raw_href) {
        return LinkRecord {
            raw_href: raw_href.to_string(),
            kind: LinkKind::External,
            resolved_url: raw_href.to_string(),
        };
    }

    LinkRecord {
        raw_href: raw_href.to_string(),
        kind: LinkKind::Internal,
        resolved_url: resolve_internal(raw_href.trim(), base),
    }
}

/// An href is external when it starts with a scheme (`ALPHA *(ALPHA / DIGIT
/// / "+" / "-" / ".") ":"`). The rest of the href is not validated, so
/// malformed absolute URLs stay external instead of being joined to the base.
pub fn is_external(href: &str) -> bool {
    scheme(href.trim()).is_some()
}

fn scheme(href: &str) -> Option<&str> {
    let candidate = &href[..href.find(':')?];
    let mut chars = candidate.chars();
    let first = chars.next()?;

    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(candidate)
}

fn resolve_internal(href: &str, base: &BaseUrl) -> String {
    let path = if href.starts_with('/') {
        clean_path(href)
    } else {
        clean_path(&format!("{}/{}", resolution_root(base.path()), href))
    };

    format!("{}://{}{}", base.scheme(), base.authority(), path)
}

/// Directory relative hrefs are joined onto. A trailing segment with a file
/// extension is a document, not a directory.
fn resolution_root(base_path: &str) -> &str {
    let last_slash = base_path.rfind('/');
    let last_segment = match last_slash {
        Some(idx) => &base_path[idx + 1..],
        None => base_path,
    };

    if last_segment.contains('.') {
        match last_slash {
            Some(idx) => &base_path[..idx],
            None => "",
        }
    } else {
        base_path
    }
}

/// Lexically canonicalise a path: rooted, no empty or `.` segments, `..`
/// resolved without climbing above `/`, no trailing slash.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}
