//! Document - High-level document API
//!
//! Every tree mutation goes through `Document` so observers see it.

use crate::observer::ObserverRegistry;
use crate::{
    DomError, DomResult, DomTree, MutationObserverInit, MutationRecord, Node, NodeData, NodeId,
    ObserverId,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    /// Document URL
    url: String,
    observers: ObserverRegistry,
}

impl Document {
    /// Create a document with the basic `html > head + body` structure
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);

        let html = doc.tree.push(Node::element("html"));
        let head = doc.tree.push(Node::element("head"));
        let body = doc.tree.push(Node::element("body"));
        doc.tree.link(NodeId::ROOT, html, None);
        doc.tree.link(html, head, None);
        doc.tree.link(html, body, None);

        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            observers: ObserverRegistry::default(),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Access the DOM tree (read-only; mutate through the document)
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The `<html>` element, if present
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.element_children(self.root()).next()
    }

    /// The `<head>` element, if present
    pub fn head(&self) -> Option<NodeId> {
        self.child_of_html("head")
    }

    /// The `<body>` element, looked up on every call
    pub fn body(&self) -> Option<NodeId> {
        self.child_of_html("body")
    }

    fn child_of_html(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree
            .element_children(html)
            .find(|&c| self.tree.tag_name(c) == Some(tag))
    }

    /// Get the first connected element with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.root())
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    // ------------------------------------------------------------------
    // Node creation (detached nodes, no records)
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree.push(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.tree.push(Node::comment(text))
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (append when `None`).
    /// An attached `child` is moved, producing a removal record first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.tree.validate_insert(parent, child, reference)?;
        // Inserting a node before itself leaves the tree unchanged
        let reference = if reference == Some(child) {
            self.tree.get(child).and_then(Node::next_sibling)
        } else {
            reference
        };

        if let Some(old_parent) = self.tree.parent(child) {
            self.detach(old_parent, child);
        }

        self.tree.link(parent, child, reference);
        let previous = self.tree.get(child).and_then(Node::prev_sibling);
        self.observers.queue(
            &self.tree,
            MutationRecord::child_list(parent, vec![child], Vec::new(), previous, reference),
        );
        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.get(parent).ok_or(DomError::NotFound(parent))?;
        self.tree.get(child).ok_or(DomError::NotFound(child))?;
        if self.tree.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(parent, child);
        Ok(child)
    }

    /// Remove a node from its parent; detached nodes are left alone
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        self.tree.get(node).ok_or(DomError::NotFound(node))?;
        if let Some(parent) = self.tree.parent(node) {
            self.detach(parent, node);
        }
        Ok(())
    }

    /// Remove every child of `parent` in one record
    pub fn clear_children(&mut self, parent: NodeId) -> DomResult<()> {
        self.tree.get(parent).ok_or(DomError::NotFound(parent))?;
        let removed: Vec<NodeId> = self.tree.children(parent).collect();
        if removed.is_empty() {
            return Ok(());
        }
        for &child in &removed {
            self.tree.unlink(child);
        }
        self.observers.queue(
            &self.tree,
            MutationRecord::child_list(parent, Vec::new(), removed, None, None),
        );
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let (previous, next) = match self.tree.get(child) {
            Some(node) => (node.prev_sibling(), node.next_sibling()),
            None => return,
        };
        self.tree.unlink(child);
        self.observers.queue(
            &self.tree,
            MutationRecord::child_list(parent, Vec::new(), vec![child], previous, next),
        );
    }

    // ------------------------------------------------------------------
    // Attributes and character data
    // ------------------------------------------------------------------

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self.element_mut(node)?;
        let old = elem.set_attr(name, value);
        let name = name.to_ascii_lowercase();
        self.observers
            .queue(&self.tree, MutationRecord::attribute(node, &name, old));
        Ok(())
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool> {
        let elem = self.element_mut(node)?;
        let Some(old) = elem.remove_attr(name) else {
            return Ok(false);
        };
        let name = name.to_ascii_lowercase();
        self.observers
            .queue(&self.tree, MutationRecord::attribute(node, &name, Some(old)));
        Ok(true)
    }

    /// Add a class token (no record when already present)
    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        let elem = self.element_mut(node)?;
        if elem.has_class(class) {
            return Ok(());
        }
        let mut classes = elem.classes().to_vec();
        classes.push(class.to_string());
        self.set_attribute(node, "class", &classes.join(" "))
    }

    /// Remove a class token (no record when absent)
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        let elem = self.element_mut(node)?;
        if !elem.has_class(class) {
            return Ok(());
        }
        let classes: Vec<&str> = elem
            .classes()
            .iter()
            .map(String::as_str)
            .filter(|c| *c != class)
            .collect();
        let value = classes.join(" ");
        self.set_attribute(node, "class", &value)
    }

    /// Replace the data of a text or comment node
    pub fn set_text(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        let target = self.tree.get_mut(node).ok_or(DomError::NotFound(node))?;
        let old = match &mut target.data {
            NodeData::Text(data) | NodeData::Comment(data) => std::mem::replace(data, text.to_string()),
            _ => return Err(DomError::InvalidNodeType(node)),
        };
        self.observers
            .queue(&self.tree, MutationRecord::character_data(node, old));
        Ok(())
    }

    fn element_mut(&mut self, node: NodeId) -> DomResult<&mut crate::ElementData> {
        if self.tree.get(node).is_none() {
            return Err(DomError::NotFound(node));
        }
        self.tree
            .element_mut(node)
            .ok_or(DomError::InvalidNodeType(node))
    }

    // ------------------------------------------------------------------
    // Mutation observers
    // ------------------------------------------------------------------

    /// Register an observer on `target`
    pub fn observe(
        &mut self,
        target: NodeId,
        options: MutationObserverInit,
    ) -> DomResult<ObserverId> {
        self.tree.get(target).ok_or(DomError::NotFound(target))?;
        let options = options.normalize()?;
        let id = self.observers.observe(target, options);
        tracing::debug!("Observer {:?} watching {}", id, self.tree.describe(target));
        Ok(id)
    }

    /// Drop an observer and its undelivered records; false if unknown
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let removed = self.observers.disconnect(id);
        if removed {
            tracing::debug!("Observer {:?} disconnected", id);
        }
        removed
    }

    /// Check if an observer is still registered
    pub fn is_observing(&self, id: ObserverId) -> bool {
        self.observers.is_registered(id)
    }

    /// Check if any observer is registered
    pub fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    /// Take the queued records of one observer
    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(id)
    }

    /// Observers with queued records, in registration order
    pub fn pending_observers(&self) -> Vec<ObserverId> {
        self.observers.pending()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
