//! elmwatch HTML loader
//!
//! HTML5 parsing built on html5ever. Used to load whole documents and to
//! splice markup into a live document the way a client render would.

mod parser;

pub use parser::HtmlParser;

use elmwatch_dom::{Document, DomError, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse `html` as body content and append it to `parent`.
///
/// Returns the inserted top-level nodes. Each one is attached with a
/// single child-list mutation, so observers see the insertion.
pub fn append_html(doc: &mut Document, parent: NodeId, html: &str) -> Result<Vec<NodeId>, HtmlError> {
    HtmlParser::new().append_html(doc, parent, html)
}

/// HTML loading error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to insert parsed nodes: {0}")]
    Dom(#[from] DomError),
}
