//! Reactor Errors
//!
//! Almost every operation on a reactor is total. The exceptions are wiring
//! a compute cell to a source the reactor does not own, and writing to an
//! input while a sweep is still running.

use thiserror::Error;

use crate::graph::CellId;

/// Errors returned by reactor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactorError {
    /// A source cell was created by a different reactor.
    #[error("cell {cell} does not belong to this reactor")]
    ForeignCell {
        /// The offending source cell.
        cell: CellId,
    },

    /// A compute cell was requested with an empty source list.
    #[error("a compute cell needs at least one source cell")]
    NoSources,

    /// An input was written from inside a callback while the reactor was
    /// sweeping, and the reactor is configured to reject such writes.
    #[error("input {cell} was written while a sweep was in progress")]
    ReentrantMutation {
        /// The input that was written.
        cell: CellId,
    },
}

/// Convenience alias for reactor results.
pub type Result<T, E = ReactorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ComputeId, InputId};

    #[test]
    fn messages_name_the_cell() {
        let err = ReactorError::ForeignCell {
            cell: CellId::Compute(ComputeId::from(3)),
        };
        assert_eq!(err.to_string(), "cell compute#3 does not belong to this reactor");

        let err = ReactorError::ReentrantMutation {
            cell: CellId::Input(InputId::from(0)),
        };
        assert_eq!(
            err.to_string(),
            "input input#0 was written while a sweep was in progress"
        );
    }
}
