//! Path resolution
//!
//! Walks a compiled path from a root element as far as the current document
//! allows.

use elmwatch_css::{find_child, query_selector};
use elmwatch_dom::{Document, NodeId};

use crate::query::{CompiledPath, CompiledQuery};

/// First element under `root` matching `query`.
///
/// Alternatives are tried in order and the first one that matches wins.
/// Direct-child selectors only look at element children of `root`, the others
/// search all descendants in document order.
pub fn find_in_root(doc: &Document, root: NodeId, query: &CompiledQuery) -> Option<NodeId> {
    let tree = doc.tree();
    query.alternatives().iter().find_map(|alt| {
        if alt.is_direct_child() {
            find_child(tree, root, alt.selectors())
        } else {
            query_selector(tree, root, alt.selectors())
        }
    })
}

/// Outcome of walking a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Every step matched; holds the last element found (the root for an empty path)
    Complete(NodeId),
    /// Stopped at `failed_step`
    Partial { failed_step: usize },
}

/// Walk `path` from `root`, calling `on_found(index, element)` for each step that matches
pub fn walk_path(
    doc: &Document,
    root: NodeId,
    path: &CompiledPath,
    mut on_found: impl FnMut(usize, NodeId),
) -> Walk {
    let mut current = root;
    for (index, step) in path.steps().iter().enumerate() {
        let Some(found) = find_in_root(doc, current, step) else {
            return Walk::Partial { failed_step: index };
        };
        on_found(index, found);
        current = found;
    }
    Walk::Complete(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Path, Query};

    fn query(q: impl Into<Query>) -> CompiledQuery {
        CompiledQuery::compile(&q.into()).unwrap()
    }

    fn path(p: impl Into<Path>) -> CompiledPath {
        CompiledPath::compile(&p.into()).unwrap()
    }

    fn element(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let id = doc.create_element(tag);
        doc.set_attribute(id, "class", class).unwrap();
        doc.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_alternatives_tried_in_order() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let a = element(&mut doc, body, "div", "a");
        let b = element(&mut doc, body, "div", "b");

        assert_eq!(find_in_root(&doc, body, &query(Query::any_of([".b", ".a"]))), Some(b));
        assert_eq!(find_in_root(&doc, body, &query(Query::any_of([".a", ".b"]))), Some(a));
        assert_eq!(find_in_root(&doc, body, &query(Query::any_of([".x", ".b"]))), Some(b));
        assert_eq!(find_in_root(&doc, body, &query(Query::any_of([".x", ".y"]))), None);
        assert_eq!(find_in_root(&doc, body, &query(Query::AnyOf(vec![]))), None);
    }

    #[test]
    fn test_direct_child_only() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let wrapper = element(&mut doc, body, "div", "wrapper");
        let deep = element(&mut doc, wrapper, "div", "item");

        assert_eq!(find_in_root(&doc, body, &query(">.item")), None);
        assert_eq!(find_in_root(&doc, body, &query(".item")), Some(deep));
        assert_eq!(find_in_root(&doc, wrapper, &query(">.item")), Some(deep));
    }

    #[test]
    fn test_walk_reports_progress() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let sidebar = element(&mut doc, body, "nav", "sidebar");

        let mut seen = Vec::new();
        let walk = walk_path(&doc, body, &path([".sidebar", ">.channel-item"]), |i, n| {
            seen.push((i, n))
        });
        assert_eq!(walk, Walk::Partial { failed_step: 1 });
        assert_eq!(seen, vec![(0, sidebar)]);

        let item = element(&mut doc, sidebar, "a", "channel-item");
        let walk = walk_path(&doc, body, &path([".sidebar", ">.channel-item"]), |_, _| {});
        assert_eq!(walk, Walk::Complete(item));
    }

    #[test]
    fn test_empty_path_completes_at_root() {
        let doc = Document::default();
        let body = doc.body().unwrap();
        assert_eq!(
            walk_path(&doc, body, &path(Path::default()), |_, _| {}),
            Walk::Complete(body)
        );
    }
}
