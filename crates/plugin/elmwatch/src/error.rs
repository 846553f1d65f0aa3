//! Watcher errors

use elmwatch_css::SelectorError;

/// Errors returned when submitting a wait request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    #[error("Invalid selector {selector:?}: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("Alternative lists cannot contain nested lists")]
    NestedQuery,
}

pub type WatchResult<T> = Result<T, WatchError>;
