//! Comprehensive tests for elmwatch-dom
//!
//! Tree mutation, traversal and mutation-observer delivery.

use elmwatch_dom::{Document, DomError, MutationObserverInit, MutationType, NodeId};

fn child_list_subtree() -> MutationObserverInit {
    MutationObserverInit {
        child_list: true,
        subtree: true,
        ..Default::default()
    }
}

fn div(doc: &mut Document, parent: NodeId) -> NodeId {
    let id = doc.create_element("div");
    doc.append_child(parent, id).unwrap();
    id
}

// ============================================================================
// TREE STRUCTURE
// ============================================================================

#[test]
fn test_insert_before_orders_children() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let c = div(&mut doc, body);
    let b = doc.create_element("p");
    doc.insert_before(body, b, Some(c)).unwrap();

    let children: Vec<_> = doc.tree().children(body).collect();
    assert_eq!(children, vec![a, b, c]);
    assert_eq!(doc.tree().previous_element_sibling(c), Some(b));
    assert_eq!(doc.tree().next_element_sibling(a), Some(b));
}

#[test]
fn test_insert_before_self_is_noop() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let b = div(&mut doc, body);

    doc.insert_before(body, a, Some(a)).unwrap();
    assert_eq!(doc.tree().children(body).collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn test_descendants_preorder() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let a1 = div(&mut doc, a);
    let a2 = div(&mut doc, a);
    let b = div(&mut doc, body);
    let a1x = div(&mut doc, a1);

    assert_eq!(
        doc.tree().descendants(body).collect::<Vec<_>>(),
        vec![a, a1, a1x, a2, b]
    );
    assert_eq!(doc.tree().descendants(a2).count(), 0);
}

#[test]
fn test_ancestors_and_contains() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let b = div(&mut doc, a);

    let chain: Vec<_> = doc.tree().ancestors(b).collect();
    assert_eq!(chain[0], a);
    assert_eq!(chain[1], body);
    assert_eq!(*chain.last().unwrap(), doc.root());
    assert!(doc.tree().contains(body, b));
    assert!(doc.tree().contains(b, b));
    assert!(!doc.tree().contains(b, body));
}

#[test]
fn test_cycles_rejected() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let b = div(&mut doc, a);

    assert_eq!(
        doc.append_child(b, a),
        Err(DomError::HierarchyRequest { parent: b, child: a })
    );
    assert_eq!(
        doc.append_child(a, a),
        Err(DomError::HierarchyRequest { parent: a, child: a })
    );
}

#[test]
fn test_text_nodes_cannot_have_children() {
    let mut doc = Document::default();
    let text = doc.create_text("hi");
    let child = doc.create_element("span");
    assert_eq!(
        doc.append_child(text, child),
        Err(DomError::HierarchyRequest { parent: text, child })
    );
}

#[test]
fn test_connectivity_follows_removal() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let b = div(&mut doc, a);
    assert!(doc.tree().is_connected(b));

    doc.remove(a).unwrap();
    assert!(!doc.tree().is_connected(b));
    assert_eq!(doc.tree().parent(b), Some(a));
    // Removing a detached node is a no-op
    doc.remove(a).unwrap();
}

#[test]
fn test_removed_nodes_stay_in_arena() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let before = doc.tree().len();

    let removed: Vec<_> = (0..10)
        .map(|_| {
            let a = div(&mut doc, body);
            doc.remove(a).unwrap();
            a
        })
        .collect();

    assert_eq!(doc.tree().len(), before + 10);
    assert_eq!(doc.tree().children(body).count(), 0);
    // Ids of removed nodes still resolve
    assert!(removed.iter().all(|&id| doc.tree().tag_name(id) == Some("div")));
    assert!(removed.iter().all(|&id| !doc.tree().is_connected(id)));
}

#[test]
fn test_get_element_by_id_ignores_detached() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    doc.set_attribute(a, "id", "app").unwrap();
    assert_eq!(doc.get_element_by_id("app"), Some(a));

    doc.remove(a).unwrap();
    assert_eq!(doc.get_element_by_id("app"), None);
}

#[test]
fn test_describe() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    doc.set_attribute(a, "id", "app").unwrap();
    doc.set_attribute(a, "class", "shell  wide").unwrap();
    let text = doc.create_text("x");

    assert_eq!(doc.tree().describe(a), "div#app.shell.wide");
    assert_eq!(doc.tree().describe(body), "body");
    assert_eq!(doc.tree().describe(text), "#text");
    assert_eq!(doc.tree().describe(doc.root()), "#document");
}

// ============================================================================
// MUTATION OBSERVERS
// ============================================================================

#[test]
fn test_records_coalesce_until_taken() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let observer = doc.observe(body, child_list_subtree()).unwrap();

    for _ in 0..5 {
        div(&mut doc, body);
    }
    assert_eq!(doc.pending_observers(), vec![observer]);
    assert_eq!(doc.take_records(observer).len(), 5);
    assert!(doc.pending_observers().is_empty());
}

#[test]
fn test_without_subtree_only_target_children() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let observer = doc
        .observe(
            body,
            MutationObserverInit {
                child_list: true,
                ..Default::default()
            },
        )
        .unwrap();

    div(&mut doc, a);
    assert!(doc.take_records(observer).is_empty());
    div(&mut doc, body);
    assert_eq!(doc.take_records(observer).len(), 1);
}

#[test]
fn test_clear_children_single_record() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = div(&mut doc, body);
    let b = div(&mut doc, body);
    let observer = doc.observe(body, child_list_subtree()).unwrap();

    doc.clear_children(body).unwrap();
    let records = doc.take_records(observer);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].removed_nodes, vec![a, b]);
    assert_eq!(doc.tree().children(body).count(), 0);
}

#[test]
fn test_old_values_when_requested() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let text = doc.create_text("before");
    doc.append_child(body, text).unwrap();

    let observer = doc
        .observe(
            body,
            MutationObserverInit {
                subtree: true,
                attribute_old_value: true,
                character_data_old_value: true,
                ..Default::default()
            },
        )
        .unwrap();

    doc.set_attribute(body, "class", "one").unwrap();
    doc.set_attribute(body, "class", "two").unwrap();
    doc.set_text(text, "after").unwrap();

    let records = doc.take_records(observer);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].old_value, None);
    assert_eq!(records[1].old_value.as_deref(), Some("one"));
    assert_eq!(records[2].mutation_type, MutationType::CharacterData);
    assert_eq!(records[2].old_value.as_deref(), Some("before"));
}

#[test]
fn test_class_helpers_skip_noops() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let observer = doc
        .observe(
            body,
            MutationObserverInit {
                attributes: true,
                ..Default::default()
            },
        )
        .unwrap();

    doc.add_class(body, "a").unwrap();
    doc.add_class(body, "a").unwrap();
    doc.remove_class(body, "missing").unwrap();
    doc.remove_class(body, "a").unwrap();
    assert!(!doc.remove_attribute(body, "data-x").unwrap());

    assert_eq!(doc.take_records(observer).len(), 2);
    assert!(!doc.tree().element(body).unwrap().has_class("a"));
}

#[test]
fn test_disconnect() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let observer = doc.observe(body, child_list_subtree()).unwrap();
    div(&mut doc, body);

    assert!(doc.is_observing(observer));
    assert!(doc.disconnect(observer));
    assert!(!doc.is_observing(observer));
    assert!(!doc.has_observers());
    assert!(doc.take_records(observer).is_empty());
    assert!(!doc.disconnect(observer));
}

#[test]
fn test_observe_requires_a_kind() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    assert_eq!(
        doc.observe(body, MutationObserverInit::default()),
        Err(DomError::InvalidObserverOptions)
    );
}
