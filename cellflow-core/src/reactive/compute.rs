//! Compute Cells
//!
//! A compute cell derives its value from one or more source cells through a
//! pure function.
//!
//! # How Compute Cells Work
//!
//! 1. The cell stores its source ids and its function, never references to
//!    other cells. Sources are resolved through the reactor's arenas.
//!
//! 2. Every read re-evaluates: source values are read (recursively
//!    re-evaluating source compute cells) and the function is applied.
//!
//! 3. The fresh result is compared with `last_computed`. If it differs,
//!    every registered callback receives the new value.
//!
//! 4. `last_computed` is updated on every evaluation, before callbacks run,
//!    so a callback that reads its own cell sees no further change.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{trace, warn};

use super::callback::{CallbackRegistry, CancelHandle};
use super::reactor::{self, ReactorId, Shared};
use super::{Cell, CellValue};
use crate::graph::{CellId, ComputeId};

/// The combining function of a compute cell.
pub(crate) type ComputeFn<T> = Rc<dyn Fn(&[T]) -> T>;

/// Arena entry for one compute cell.
pub(crate) struct ComputeSlot<T: CellValue> {
    sources: SmallVec<[CellId; 2]>,
    compute: ComputeFn<T>,

    /// Result of the most recent evaluation. Change detection compares
    /// against this.
    last_computed: T,

    pub(crate) callbacks: CallbackRegistry<T>,
}

impl<T: CellValue> ComputeSlot<T> {
    pub(crate) fn new(sources: SmallVec<[CellId; 2]>, compute: ComputeFn<T>, initial: T) -> Self {
        Self {
            sources,
            compute,
            last_computed: initial,
            callbacks: CallbackRegistry::new(),
        }
    }
}

/// Re-evaluate a compute cell and fire its callbacks if the value changed.
///
/// No borrow of the graph is held while the compute function or a callback
/// runs.
pub(crate) fn evaluate<T: CellValue>(graph: &Shared<T>, id: ComputeId) -> T {
    let (sources, compute) = {
        let state = graph.borrow();
        let slot = &state.computes[id.index()];
        (slot.sources.clone(), Rc::clone(&slot.compute))
    };

    let values: SmallVec<[T; 2]> = sources
        .iter()
        .map(|&source| reactor::read(graph, source))
        .collect();
    let value = compute(values.as_slice());

    let fired = {
        let mut state = graph.borrow_mut();
        let slot = &mut state.computes[id.index()];
        let changed = slot.last_computed != value;
        slot.last_computed = value.clone();
        if changed {
            slot.callbacks.snapshot()
        } else {
            Vec::new()
        }
    };

    trace!(
        cell = %CellId::from(id),
        value = ?value,
        callbacks = fired.len(),
        "evaluated compute cell"
    );

    for (callback_id, callback) in fired {
        // An earlier callback in this batch may have cancelled this one
        let live = graph.borrow().computes[id.index()]
            .callbacks
            .contains(callback_id);
        if !live {
            continue;
        }

        match callback.try_borrow_mut() {
            Ok(mut callback) => (&mut *callback)(value.clone()),
            Err(_) => warn!(
                cell = %CellId::from(id),
                callback = callback_id.raw(),
                "callback is already running, skipping nested invocation"
            ),
        }
    }

    value
}

/// Handle to a compute cell.
///
/// Clones refer to the same cell.
pub struct ComputeCell<T: CellValue> {
    graph: Shared<T>,
    reactor: ReactorId,
    id: ComputeId,
}

impl<T: CellValue> ComputeCell<T> {
    pub(crate) fn new(graph: Shared<T>, reactor: ReactorId, id: ComputeId) -> Self {
        Self { graph, reactor, id }
    }

    pub fn id(&self) -> ComputeId {
        self.id
    }

    /// Register a callback invoked with the new value each time this cell's
    /// value changes.
    ///
    /// Callbacks registered on the same cell fire in registration order.
    pub fn add_callback<F>(&self, callback: F) -> CancelHandle<T>
    where
        F: FnMut(T) + 'static,
    {
        let callback_id = self.graph.borrow_mut().computes[self.id.index()]
            .callbacks
            .insert(callback);
        trace!(cell = %CellId::from(self.id), callback = callback_id.raw(), "callback added");

        CancelHandle::new(Rc::clone(&self.graph), self.id, callback_id)
    }

    /// Number of callbacks currently registered.
    pub fn callback_count(&self) -> usize {
        self.graph.borrow().computes[self.id.index()].callbacks.len()
    }
}

impl<T: CellValue> super::sealed::Sealed for ComputeCell<T> {}

impl<T: CellValue> Cell<T> for ComputeCell<T> {
    /// Re-evaluate the cell against its sources' current values.
    ///
    /// If the result differs from the previous evaluation the cell's
    /// callbacks fire before this returns.
    fn value(&self) -> T {
        evaluate(&self.graph, self.id)
    }

    fn cell_id(&self) -> CellId {
        self.id.into()
    }

    fn reactor_id(&self) -> ReactorId {
        self.reactor
    }
}

impl<T: CellValue> Clone for ComputeCell<T> {
    fn clone(&self) -> Self {
        Self {
            graph: Rc::clone(&self.graph),
            reactor: self.reactor,
            id: self.id,
        }
    }
}

impl<T: CellValue> fmt::Debug for ComputeCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Formatting must not evaluate, or it could fire callbacks
        let state = self.graph.borrow();
        let slot = &state.computes[self.id.index()];
        f.debug_struct("ComputeCell")
            .field("id", &self.id)
            .field("sources", &slot.sources.as_slice())
            .field("last_computed", &slot.last_computed)
            .field("callback_count", &slot.callbacks.len())
            .finish()
    }
}
