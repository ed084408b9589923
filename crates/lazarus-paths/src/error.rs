//! Search error types.

use crate::search::SearchState;

/// Errors raised by the search state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The operation is not allowed in the session's current state.
    #[error("cannot {operation} a search in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SearchState,
    },
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
