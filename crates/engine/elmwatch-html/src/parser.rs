//! HTML5 Parser implementation
//!
//! Parses with html5ever into an RcDom and converts that into the arena
//! document.

use elmwatch_dom::{Document, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = Self::parse_rcdom(html)?;
        let mut document = Document::empty(url);
        let root = document.root();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, &mut document)? {
                document.append_child(root, id)?;
            }
        }

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `html` as body content and append the result to `parent`
    pub fn append_html(
        &self,
        document: &mut Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, HtmlError> {
        let dom = Self::parse_rcdom(html)?;
        let Some(body) = find_body(&dom.document) else {
            return Ok(Vec::new());
        };

        // Build detached subtrees first so observers only see the top-level inserts
        let mut built = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, document)? {
                built.push(id);
            }
        }
        for &id in &built {
            document.append_child(parent, id)?;
        }

        tracing::debug!("Inserted {} nodes into {}", built.len(), document.tree().describe(parent));
        Ok(built)
    }

    fn parse_rcdom(html: &str) -> Result<RcDom, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node into a detached arena subtree
    fn convert_node(
        &self,
        handle: &Handle,
        document: &mut Document,
    ) -> Result<Option<NodeId>, HtmlError> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return Ok(None);
                }
                return Ok(Some(document.create_text(&text)));
            }
            RcNodeData::Comment { contents } => {
                return Ok(Some(document.create_comment(contents)));
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = document.create_element(name.local.as_ref());
                for attr in attrs.borrow().iter() {
                    document.set_attribute(id, attr.name.local.as_ref(), &attr.value)?;
                }
                id
            }
            // Doctypes, processing instructions and nested documents are dropped
            _ => return Ok(None),
        };

        for child in handle.children.borrow().iter() {
            if let Some(child_id) = self.convert_node(child, document)? {
                document.append_child(id, child_id)?;
            }
        }
        Ok(Some(id))
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_child_element(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if name.local.as_ref() == tag))
        .cloned()
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_child_element(document, "html")?;
    find_child_element(&html, "body")
}
