use crate::walker::ExtractionState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Markup version as declared by the document type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HtmlVersion {
    #[default]
    #[serde(rename = "5.0")]
    Html5,
    #[serde(rename = "4.01")]
    Html401,
}

impl HtmlVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html5 => "5.0",
            Self::Html401 => "4.01",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnalysisResult {
    html_version: HtmlVersion,
    page_title: String,
    headings: BTreeMap<String, usize>,
    internal_links_count: usize,
    external_links_count: usize,
    inaccessible_links_count: usize,
    contains_login_form: bool,
}

impl PageAnalysisResult {
    /// Combine the walk's extraction state with the prober's count.
    pub fn assemble(state: ExtractionState, inaccessible: usize) -> Self {
        Self {
            html_version: state.html_version,
            page_title: state.title.unwrap_or_default(),
            headings: state.headings,
            internal_links_count: state.internal_count,
            external_links_count: state.external_count,
            inaccessible_links_count: inaccessible,
            contains_login_form: state.contains_login_form,
        }
    }

    pub fn html_version(&self) -> HtmlVersion {
        self.html_version
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn headings(&self) -> &BTreeMap<String, usize> {
        &self.headings
    }

    pub fn internal_links_count(&self) -> usize {
        self.internal_links_count
    }

    pub fn external_links_count(&self) -> usize {
        self.external_links_count
    }

    pub fn inaccessible_links_count(&self) -> usize {
        self.inaccessible_links_count
    }

    pub fn contains_login_form(&self) -> bool {
        self.contains_login_form
    }

    pub fn total_links(&self) -> usize {
        self.internal_links_count + self.external_links_count
    }
}
