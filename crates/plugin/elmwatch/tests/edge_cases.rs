//! Edge case tests for elmwatch

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use elmwatch::{
    Document, EventLoop, NodeId, Page, Path, PathWatcher, Query, WaitConfig, WaitState, WatchError,
};

fn element(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
    let id = doc.create_element(tag);
    doc.set_attribute(id, "class", class).unwrap();
    doc.append_child(parent, id).unwrap();
    id
}

// ============================================================================
// ROOTS
// ============================================================================

#[test]
fn test_missing_body_is_not_an_error() {
    let mut page = Page::new(Document::empty("about:blank"));
    let mut future = page.wait_for_elm(".x", WaitConfig::new()).unwrap();

    assert_eq!(future.state(), WaitState::Pending);
    assert_eq!(page.watcher().pending_count(), 1);
    // Nothing to observe without a body
    assert!(!page.watcher().is_observing());

    let reports = page.advance(Duration::from_secs(10));
    assert_eq!(reports[0].root, "<no root>");
}

#[test]
fn test_detached_root_resolves_immediately() {
    let mut page = Page::default();
    let (fragment, inner) = page.mutate(|doc| {
        let fragment = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.add_class(inner, "inner").unwrap();
        doc.append_child(fragment, inner).unwrap();
        (fragment, inner)
    });

    let mut future = page
        .wait_for_elm(".inner", WaitConfig::new().root(fragment))
        .unwrap();
    assert_eq!(future.state(), WaitState::Resolved(inner));
}

#[test]
fn test_empty_path_uses_explicit_root() {
    let mut page = Page::default();
    let root = page.mutate(|doc| doc.create_element("section"));

    let mut future = page.wait_for_elm(Path::default(), WaitConfig::new().root(root)).unwrap();
    assert_eq!(future.state(), WaitState::Resolved(root));
}

#[test]
fn test_root_itself_never_matches() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    page.mutate(|doc| doc.add_class(body, "shell").unwrap());

    let mut future = page.wait_for_elm(".shell", WaitConfig::new()).unwrap();
    assert_eq!(future.state(), WaitState::Pending);
}

// ============================================================================
// QUERIES
// ============================================================================

#[test]
fn test_empty_alternatives_never_resolve() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let mut future = page
        .wait_for_elm(Query::AnyOf(Vec::new()), WaitConfig::new())
        .unwrap();

    page.mutate(|doc| element(doc, body, "div", "anything"));
    assert_eq!(future.state(), WaitState::Pending);
}

#[test]
fn test_direct_child_prefix_tolerates_whitespace() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let item = page.mutate(|doc| element(doc, body, "div", "item"));

    let mut future = page.wait_for_elm(">  .item", WaitConfig::new()).unwrap();
    assert_eq!(future.state(), WaitState::Resolved(item));
}

#[test]
fn test_direct_child_prefix_must_lead() {
    let mut page = Page::default();

    let err = page.wait_for_elm(" >.item", WaitConfig::new()).unwrap_err();
    assert!(matches!(err, WatchError::Selector { ref selector, .. } if selector == " >.item"));
    assert_eq!(page.watcher().pending_count(), 0);
}

#[test]
fn test_direct_child_scope_is_the_child() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let mut future = page.wait_for_elm(">:scope.x", WaitConfig::new()).unwrap();
    assert_eq!(future.state(), WaitState::Pending);

    page.mutate(|doc| element(doc, body, "div", "y"));
    let x = page.mutate(|doc| element(doc, body, "div", "x"));
    assert_eq!(future.state(), WaitState::Resolved(x));
}

#[test]
fn test_nth_child_with_extreme_offset() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let div = page.mutate(|doc| element(doc, body, "div", "first"));

    let mut future = page
        .wait_for_elm("div:nth-child(n-2147483648)", WaitConfig::new())
        .unwrap();
    assert_eq!(future.state(), WaitState::Resolved(div));
}

#[test]
fn test_combinators_see_outside_root() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let (list, entry) = page.mutate(|doc| {
        let app = element(doc, body, "div", "app");
        let list = element(doc, app, "ul", "list");
        let entry = element(doc, list, "li", "entry");
        (list, entry)
    });

    let mut future = page
        .wait_for_elm(".app li", WaitConfig::new().root(list))
        .unwrap();
    assert_eq!(future.state(), WaitState::Resolved(entry));
}

#[test]
fn test_invalid_selector_rejected() {
    let mut page = Page::default();

    let err = page
        .wait_for_elm([".fine", "div:hover"], WaitConfig::new())
        .unwrap_err();
    assert!(matches!(err, WatchError::Selector { ref selector, .. } if selector == "div:hover"));
    assert!(err.to_string().contains("div:hover"));

    assert!(page.wait_for_elm(">", WaitConfig::new()).is_err());
    assert_eq!(page.watcher().pending_count(), 0);
    assert!(page.advance(Duration::from_secs(30)).is_empty());
}

// ============================================================================
// FUTURES
// ============================================================================

#[test]
fn test_dropped_future_still_notifies_steps() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    drop(
        page.wait_for_elm(".late", WaitConfig::new().on_step(move |n| sink.borrow_mut().push(n)))
            .unwrap(),
    );
    let late = page.mutate(|doc| element(doc, body, "div", "late"));

    assert_eq!(*seen.borrow(), vec![late]);
    assert_eq!(page.watcher().pending_count(), 0);
}

#[test]
fn test_one_element_resolves_many_requests() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();

    let mut by_class = page.wait_for_elm(".target", WaitConfig::new()).unwrap();
    let mut by_tag = page.wait_for_elm("article", WaitConfig::new()).unwrap();
    let target = page.mutate(|doc| element(doc, body, "article", "target"));

    assert_eq!(by_class.state(), WaitState::Resolved(target));
    assert_eq!(by_tag.state(), WaitState::Resolved(target));
    // Repeated polling keeps the cached value
    assert_eq!(by_tag.state(), WaitState::Resolved(target));
}

#[test]
fn test_dropping_watcher_abandons_waits() {
    let mut doc = Document::default();
    let mut timers = EventLoop::new();
    let mut watcher = PathWatcher::new();

    let mut future = watcher
        .wait_for_elm(&mut doc, &mut timers, ".never", WaitConfig::new())
        .unwrap();
    drop(watcher);
    assert_eq!(future.state(), WaitState::Abandoned);
}

// ============================================================================
// OBSERVER
// ============================================================================

#[test]
fn test_body_replaced_while_waiting() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let html = page.document().document_element().unwrap();
    let mut future = page.wait_for_elm(".late", WaitConfig::new()).unwrap();

    // Observer stays on the removed body
    let new_body = page.mutate(|doc| {
        doc.remove(body).unwrap();
        let new_body = doc.create_element("body");
        doc.append_child(html, new_body).unwrap();
        new_body
    });
    page.mutate(|doc| element(doc, new_body, "div", "late"));
    assert_eq!(future.state(), WaitState::Pending);

    // Any mutation under the old body triggers a pass that reads the new one
    page.mutate(|doc| doc.add_class(body, "stale").unwrap());
    assert!(matches!(future.state(), WaitState::Resolved(_)));
}

#[test]
fn test_two_watchers_share_a_document() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let mut timers = EventLoop::new();
    let mut first = PathWatcher::new();
    let mut second = PathWatcher::new();

    let mut a = first
        .wait_for_elm(&mut doc, &mut timers, ".a", WaitConfig::new())
        .unwrap();
    let mut b = second
        .wait_for_elm(&mut doc, &mut timers, ".b", WaitConfig::new())
        .unwrap();

    element(&mut doc, body, "div", "a");
    assert!(first.deliver_mutations(&mut doc));
    assert!(second.deliver_mutations(&mut doc));
    assert!(matches!(a.state(), WaitState::Resolved(_)));
    assert_eq!(b.state(), WaitState::Pending);

    first.disobserve(&mut doc);
    assert!(second.is_observing());
    assert!(doc.has_observers());

    element(&mut doc, body, "div", "b");
    assert!(second.deliver_mutations(&mut doc));
    assert!(matches!(b.state(), WaitState::Resolved(_)));
    assert!(!doc.has_observers());
}

#[test]
fn test_disobserve_is_idempotent() {
    let mut page = Page::default();
    page.disobserve();
    let _future = page.wait_for_elm(".x", WaitConfig::new()).unwrap();
    page.disobserve();
    page.disobserve();
    assert!(!page.watcher().is_observing());
    assert!(!page.document().has_observers());
}

#[test]
fn test_text_changes_do_not_dispatch() {
    let mut page = Page::default();
    let body = page.document().body().unwrap();
    let text = page.mutate(|doc| {
        let text = doc.create_text("loading");
        doc.append_child(body, text).unwrap();
        text
    });

    let _future = page.wait_for_elm(".x", WaitConfig::new()).unwrap();
    page.document_mut().set_text(text, "ready").unwrap();
    assert!(!page.flush_mutations());
}
