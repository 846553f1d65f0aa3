//! Selector matching and scoped queries
//!
//! Complex selectors are matched right to left. Combinators may walk past
//! the query root: like `Element.querySelector`, the selector is evaluated
//! against the whole document and only the results are scoped.

use elmwatch_dom::{DomTree, NodeData, NodeId};

use crate::selectors::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorList,
};

impl SelectorList {
    /// Check if `node` matches (`:scope` behaves like `:root`)
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.matches_in_scope(tree, node, None)
    }

    /// Check if `node` matches with `:scope` bound to `scope`
    pub fn matches_in_scope(&self, tree: &DomTree, node: NodeId, scope: Option<NodeId>) -> bool {
        tree.is_element(node)
            && self
                .selectors
                .iter()
                .any(|selector| matches_complex(tree, node, selector, scope))
    }
}

fn matches_complex(
    tree: &DomTree,
    node: NodeId,
    selector: &ComplexSelector,
    scope: Option<NodeId>,
) -> bool {
    match selector.compounds.len() {
        0 => false,
        n => matches_from(tree, node, selector, n - 1, scope),
    }
}

/// Match `compounds[idx]` against `node`, then the rest leftwards
fn matches_from(
    tree: &DomTree,
    node: NodeId,
    selector: &ComplexSelector,
    idx: usize,
    scope: Option<NodeId>,
) -> bool {
    if !matches_compound(tree, node, &selector.compounds[idx], scope) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    let next = |candidate: NodeId| matches_from(tree, candidate, selector, idx - 1, scope);
    match selector.combinators[idx - 1] {
        Combinator::Child => tree
            .parent(node)
            .filter(|&p| tree.is_element(p))
            .is_some_and(next),
        Combinator::Descendant => tree
            .ancestors(node)
            .filter(|&a| tree.is_element(a))
            .any(next),
        Combinator::NextSibling => tree.previous_element_sibling(node).is_some_and(next),
        Combinator::SubsequentSibling => {
            std::iter::successors(tree.previous_element_sibling(node), |&s| {
                tree.previous_element_sibling(s)
            })
            .any(next)
        }
    }
}

/// Match a compound selector against one element
pub fn matches_compound(
    tree: &DomTree,
    node: NodeId,
    compound: &CompoundSelector,
    scope: Option<NodeId>,
) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if !elem.name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if elem.id() != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| elem.has_class(c)) {
        return false;
    }
    if !compound
        .attributes
        .iter()
        .all(|attr: &AttributeSelector| attr.matches(elem.get_attr(&attr.name)))
    {
        return false;
    }

    compound
        .pseudo_classes
        .iter()
        .all(|pseudo| match_pseudo_class(tree, node, pseudo, scope))
}

/// Match a pseudo-class against an element
fn match_pseudo_class(
    tree: &DomTree,
    node: NodeId,
    pseudo: &PseudoClass,
    scope: Option<NodeId>,
) -> bool {
    match pseudo {
        PseudoClass::Root => is_root(tree, node),
        PseudoClass::Empty => tree.children(node).all(|c| {
            tree.get(c).is_some_and(|n| match &n.data {
                NodeData::Comment(_) => true,
                NodeData::Text(t) => t.is_empty(),
                _ => false,
            })
        }),
        PseudoClass::FirstChild => position(tree, node, false).0 == 1,
        PseudoClass::LastChild => {
            let (index, count) = position(tree, node, false);
            index == count
        }
        PseudoClass::OnlyChild => position(tree, node, false).1 == 1,
        PseudoClass::FirstOfType => position(tree, node, true).0 == 1,
        PseudoClass::LastOfType => {
            let (index, count) = position(tree, node, true);
            index == count
        }
        PseudoClass::OnlyOfType => position(tree, node, true).1 == 1,
        PseudoClass::NthChild(expr) => expr.matches(position(tree, node, false).0 as i32),
        PseudoClass::NthLastChild(expr) => {
            let (index, count) = position(tree, node, false);
            expr.matches((count - index + 1) as i32)
        }
        PseudoClass::NthOfType(expr) => expr.matches(position(tree, node, true).0 as i32),
        PseudoClass::NthLastOfType(expr) => {
            let (index, count) = position(tree, node, true);
            expr.matches((count - index + 1) as i32)
        }
        PseudoClass::Not(list) => !list.matches_in_scope(tree, node, scope),
        PseudoClass::Is(list) | PseudoClass::Where(list) => {
            list.matches_in_scope(tree, node, scope)
        }
        PseudoClass::Scope => match scope {
            Some(scope) => scope == node,
            None => is_root(tree, node),
        },
    }
}

fn is_root(tree: &DomTree, node: NodeId) -> bool {
    tree.parent(node) == Some(tree.root())
}

/// 1-based index among element siblings and the sibling count.
/// `same_type` restricts both to siblings with the same tag.
fn position(tree: &DomTree, node: NodeId, same_type: bool) -> (usize, usize) {
    let Some(parent) = tree.parent(node) else {
        return (1, 1);
    };
    let tag = tree.tag_name(node);

    let mut index = 0;
    let mut count = 0;
    for sibling in tree.element_children(parent) {
        if same_type && tree.tag_name(sibling) != tag {
            continue;
        }
        count += 1;
        if sibling == node {
            index = count;
        }
    }
    (index, count)
}

/// First descendant of `root` (document order, `root` excluded) matching `selectors`
pub fn query_selector(tree: &DomTree, root: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    tree.descendants(root)
        .find(|&n| selectors.matches_in_scope(tree, n, Some(root)))
}

/// All descendants of `root` matching `selectors`, in document order
pub fn query_selector_all(tree: &DomTree, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
    tree.descendants(root)
        .filter(|&n| selectors.matches_in_scope(tree, n, Some(root)))
        .collect()
}

/// First element child of `root` matching `selectors`.
/// Each child is tested like `Element.matches`, so `:scope` is the child itself.
pub fn find_child(tree: &DomTree, root: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    tree.element_children(root)
        .find(|&c| selectors.matches_in_scope(tree, c, Some(c)))
}

/// Nearest inclusive ancestor of `node` matching `selectors`
pub fn closest(tree: &DomTree, node: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .filter(|&n| tree.is_element(n))
        .find(|&n| selectors.matches(tree, n))
}
