//! Queries and paths
//!
//! A [`Query`] locates one element under a search root: a selector, or a list
//! of alternative selectors tried in order. A [`Path`] chains queries, each
//! step searching under the element found by the previous one.
//!
//! A selector starting with `>` only matches direct children of the root.

use std::fmt;

use elmwatch_css::SelectorList;
use serde::Deserialize;

use crate::error::{WatchError, WatchResult};

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// A single selector
    Single(String),
    /// Alternative selectors, first match wins
    AnyOf(Vec<String>),
}

impl Query {
    pub fn single(selector: impl Into<String>) -> Self {
        Self::Single(selector.into())
    }

    pub fn any_of<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(selectors.into_iter().map(Into::into).collect())
    }

    /// Selectors in the order they are tried
    pub fn selectors(&self) -> &[String] {
        match self {
            Self::Single(selector) => std::slice::from_ref(selector),
            Self::AnyOf(selectors) => selectors,
        }
    }
}

impl From<&str> for Query {
    fn from(selector: &str) -> Self {
        Self::single(selector)
    }
}

impl From<String> for Query {
    fn from(selector: String) -> Self {
        Self::Single(selector)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(selector) => write!(f, "{:?}", selector),
            Self::AnyOf(selectors) => write!(f, "{:?}", selectors),
        }
    }
}

/// Ordered chain of queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Query>);

impl Path {
    pub fn new(steps: Vec<Query>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Query] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", step)?;
        }
        f.write_str("]")
    }
}

// A bare selector or query is a one-step path; sequences are paths.

impl From<Query> for Path {
    fn from(query: Query) -> Self {
        Self(vec![query])
    }
}

impl From<&str> for Path {
    fn from(selector: &str) -> Self {
        Self(vec![Query::from(selector)])
    }
}

impl From<String> for Path {
    fn from(selector: String) -> Self {
        Self(vec![Query::from(selector)])
    }
}

impl From<Vec<Query>> for Path {
    fn from(steps: Vec<Query>) -> Self {
        Self(steps)
    }
}

impl From<Vec<&str>> for Path {
    fn from(steps: Vec<&str>) -> Self {
        Self(steps.into_iter().map(Query::from).collect())
    }
}

impl From<&[&str]> for Path {
    fn from(steps: &[&str]) -> Self {
        Self(steps.iter().copied().map(Query::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(steps: [&str; N]) -> Self {
        Self(steps.into_iter().map(Query::from).collect())
    }
}

/// Dynamically shaped query input: a selector or a (nested) list of them
///
/// Deserializes from JSON-like data such as `"#app"`, `[".a", ">.b"]` or
/// `[[".a", ".b"], ".c"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawQueries {
    One(String),
    Many(Vec<RawQueries>),
}

impl TryFrom<RawQueries> for Query {
    type Error = WatchError;

    fn try_from(raw: RawQueries) -> WatchResult<Self> {
        match raw {
            RawQueries::One(selector) => Ok(Self::Single(selector)),
            RawQueries::Many(alternatives) => alternatives
                .into_iter()
                .map(|alt| match alt {
                    RawQueries::One(selector) => Ok(selector),
                    RawQueries::Many(_) => Err(WatchError::NestedQuery),
                })
                .collect::<WatchResult<Vec<_>>>()
                .map(Self::AnyOf),
        }
    }
}

impl TryFrom<RawQueries> for Path {
    type Error = WatchError;

    fn try_from(raw: RawQueries) -> WatchResult<Self> {
        match raw {
            RawQueries::One(selector) => Ok(Self::from(selector)),
            RawQueries::Many(steps) => steps
                .into_iter()
                .map(Query::try_from)
                .collect::<WatchResult<Vec<_>>>()
                .map(Self),
        }
    }
}

// ============================================================================
// Compiled forms
// ============================================================================

/// A parsed selector with its direct-child flag
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    source: String,
    direct_child: bool,
    selectors: SelectorList,
}

impl CompiledSelector {
    pub fn compile(source: &str) -> WatchResult<Self> {
        // Only a `>` in the very first position marks a direct-child step
        let (direct_child, rest) = match source.strip_prefix('>') {
            Some(rest) => (true, rest),
            None => (false, source),
        };
        let selectors = SelectorList::parse(rest).map_err(|source_err| WatchError::Selector {
            selector: source.to_string(),
            source: source_err,
        })?;

        Ok(Self {
            source: source.to_string(),
            direct_child,
            selectors,
        })
    }

    /// The selector as submitted, including any `>` prefix
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_direct_child(&self) -> bool {
        self.direct_child
    }

    pub fn selectors(&self) -> &SelectorList {
        &self.selectors
    }
}

/// A compiled [`Query`]
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    alternatives: Vec<CompiledSelector>,
}

impl CompiledQuery {
    pub fn compile(query: &Query) -> WatchResult<Self> {
        let alternatives = query
            .selectors()
            .iter()
            .map(|s| CompiledSelector::compile(s))
            .collect::<WatchResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    pub fn alternatives(&self) -> &[CompiledSelector] {
        &self.alternatives
    }
}

/// A compiled [`Path`]
#[derive(Debug, Clone)]
pub struct CompiledPath {
    steps: Vec<CompiledQuery>,
}

impl CompiledPath {
    pub fn compile(path: &Path) -> WatchResult<Self> {
        let steps = path
            .steps()
            .iter()
            .map(CompiledQuery::compile)
            .collect::<WatchResult<Vec<_>>>()?;
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[CompiledQuery] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
