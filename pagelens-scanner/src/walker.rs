use crate::resolver::{BaseUrl, LinkKind, LinkRecord, classify};
use crate::result::HtmlVersion;
use scraper::{Html, Node};
use std::collections::BTreeMap;
use tracing::debug;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Facts accumulated by a single walk over a document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionState {
    pub(crate) html_version: HtmlVersion,
    pub(crate) title: Option<String>,
    pub(crate) headings: BTreeMap<String, usize>,
    pub(crate) links: Vec<LinkRecord>,
    pub(crate) internal_count: usize,
    pub(crate) external_count: usize,
    pub(crate) contains_login_form: bool,
}

impl ExtractionState {
    pub fn html_version(&self) -> HtmlVersion {
        self.html_version
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn headings(&self) -> &BTreeMap<String, usize> {
        &self.headings
    }

    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    pub fn internal_count(&self) -> usize {
        self.internal_count
    }

    pub fn external_count(&self) -> usize {
        self.external_count
    }

    pub fn contains_login_form(&self) -> bool {
        self.contains_login_form
    }

    /// Probe targets, in document order.
    pub fn resolved_urls(&self) -> Vec<String> {
        self.links
            .iter()
            .map(|link| link.resolved_url().to_string())
            .collect()
    }

    fn record_link(&mut self, link: LinkRecord) {
        match link.kind() {
            LinkKind::Internal => self.internal_count += 1,
            LinkKind::External => self.external_count += 1,
        }
        self.links.push(link);
    }
}

/// Parse `markup` and walk it. The parsed tree never leaves this call.
pub fn walk_markup(markup: &str, base: &BaseUrl) -> ExtractionState {
    let document = Html::parse_document(markup);
    if !document.errors.is_empty() {
        debug!("Parser recovered from {} markup errors", document.errors.len());
    }
    walk(&document, base)
}

/// Pre-order depth-first walk, children left to right. Each node travels
/// with its parent on the stack.
pub fn walk(document: &Html, base: &BaseUrl) -> ExtractionState {
    let mut state = ExtractionState::default();
    let mut stack = vec![(document.tree.root(), None)];

    while let Some((node, parent)) = stack.pop() {
        visit(&mut state, node.value(), parent, base);

        for child in node.children().rev() {
            stack.push((child, Some(node.value())));
        }
    }

    debug!(
        "Walk complete: {} headings, {} internal / {} external links",
        state.headings.values().sum::<usize>(),
        state.internal_count,
        state.external_count
    );
    state
}

fn visit(state: &mut ExtractionState, node: &Node, parent: Option<&Node>, base: &BaseUrl) {
    match node {
        Node::Doctype(doctype) => {
            // Only legacy doctypes carry public/system identifiers
            if doctype.name().eq_ignore_ascii_case("html")
                && (!doctype.public_id().is_empty() || !doctype.system_id().is_empty())
            {
                state.html_version = HtmlVersion::Html401;
            }
        }
        Node::Text(text) => {
            let in_title = parent
                .and_then(Node::as_element)
                .is_some_and(|element| element.name() == "title");

            if in_title && state.title.is_none() {
                let content: &str = text;
                state.title = Some(content.to_string());
            }
        }
        Node::Element(element) => match element.name() {
            name if HEADING_TAGS.contains(&name) => {
                *state.headings.entry(name.to_string()).or_insert(0) += 1;
            }
            "a" => {
                let href = element
                    .attrs()
                    .find(|(key, value)| *key == "href" && !value.is_empty())
                    .map(|(_, value)| value);

                if let Some(href) = href {
                    state.record_link(classify(href, base));
                }
            }
            "input" => {
                // Enumerated attribute values are ASCII case-insensitive in HTML,
                // so `type="PASSWORD"` counts as well
                if element
                    .attrs()
                    .any(|(key, value)| key == "type" && value.eq_ignore_ascii_case("password"))
                {
                    state.contains_login_form = true;
                }
            }
            _ => {}
        },
        _ => {}
    }
}
