//! elmwatch CSS selectors
//!
//! Parsing and matching of the selector subset used to locate UI elements:
//! compound selectors, the four combinators, selector lists and the
//! structural / logical pseudo-classes.

mod matching;
mod parser;
mod selectors;

pub use matching::{closest, find_child, matches_compound, query_selector, query_selector_all};
pub use parser::SelectorParser;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorList,
};

/// Parse a selector list
pub fn parse_selector(input: &str) -> Result<SelectorList, SelectorError> {
    SelectorParser::new(input).parse().inspect_err(|err| {
        tracing::trace!("Rejected selector {:?}: {}", input, err);
    })
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        parse_selector(input)
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected {found} at position {position} in selector {selector:?}")]
    UnexpectedToken {
        selector: String,
        position: usize,
        found: String,
    },

    #[error("Selector {0:?} ends with a combinator")]
    DanglingCombinator(String),

    #[error("Unsupported pseudo-class: {0}")]
    UnsupportedPseudo(String),

    #[error("Invalid An+B expression: {0:?}")]
    InvalidNth(String),
}
