//! Sweep Context
//!
//! A reactor is "sweeping" from the moment an input write starts propagating
//! until every queued write has been applied. Callbacks run inside that
//! window, so this is where reentrant writes are detected.
//!
//! # Implementation
//!
//! The flag lives in the shared graph state and is managed by a guard:
//! entering sets it, dropping the guard clears it. Because clearing happens
//! in `Drop`, a panicking callback cannot leave the reactor stuck in the
//! sweeping state.

use super::reactor::Shared;
use super::CellValue;

/// Guard that marks the reactor as sweeping until dropped.
pub(crate) struct SweepContext<'a, T: CellValue> {
    graph: &'a Shared<T>,
}

impl<'a, T: CellValue> SweepContext<'a, T> {
    /// Mark the reactor as sweeping.
    ///
    /// Sweeps do not nest: a write issued during a sweep is either rejected
    /// or queued before a second context could be entered.
    pub(crate) fn enter(graph: &'a Shared<T>) -> Self {
        let mut state = graph.borrow_mut();
        debug_assert!(!state.sweeping, "sweep contexts must not nest");
        state.sweeping = true;
        drop(state);

        Self { graph }
    }

    /// Check whether the reactor behind `graph` is sweeping.
    pub(crate) fn is_active(graph: &Shared<T>) -> bool {
        graph.borrow().sweeping
    }
}

impl<T: CellValue> Drop for SweepContext<'_, T> {
    fn drop(&mut self) {
        // try_borrow_mut: this may run while unwinding out of a callback
        if let Ok(mut state) = self.graph.try_borrow_mut() {
            state.sweeping = false;
            if !state.pending.is_empty() {
                tracing::warn!(
                    dropped = state.pending.len(),
                    "sweep ended early, discarding queued writes"
                );
                state.pending.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::reactor::Graph;
    use crate::ReactorConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn graph() -> Shared<i32> {
        Rc::new(RefCell::new(Graph::new(ReactorConfig::default())))
    }

    #[test]
    fn context_sets_and_clears_flag() {
        let graph = graph();
        assert!(!SweepContext::is_active(&graph));

        {
            let _ctx = SweepContext::enter(&graph);
            assert!(SweepContext::is_active(&graph));
        }

        assert!(!SweepContext::is_active(&graph));
    }

    #[test]
    fn context_clears_flag_on_panic() {
        let graph = graph();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ctx = SweepContext::enter(&graph);
            panic!("callback failed");
        }));

        assert!(result.is_err());
        assert!(!SweepContext::is_active(&graph));
    }
}
