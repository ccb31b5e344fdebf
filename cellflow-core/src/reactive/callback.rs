//! Change callbacks for compute cells.
//!
//! Each compute cell keeps its own registry of callbacks. Ids come from a
//! per-cell counter, so they are unique among the cell's callbacks and never
//! reused, which makes a stale [`CancelHandle`] harmless.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::reactor::Shared;
use super::CellValue;
use crate::graph::ComputeId;

/// Identifier of a callback, unique within the compute cell it was added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    /// Get the raw counter value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A registered callback.
///
/// Callbacks are `FnMut`, so each one sits behind its own `RefCell`. The
/// `Rc` lets a firing pass hold on to the callbacks it is about to run
/// without keeping the graph borrowed while client code executes.
pub(crate) type SharedCallback<T> = Rc<RefCell<dyn FnMut(T)>>;

/// The callbacks registered on one compute cell.
pub(crate) struct CallbackRegistry<T> {
    next_id: u64,
    callbacks: IndexMap<CallbackId, SharedCallback<T>>,
}

impl<T: CellValue> CallbackRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: IndexMap::new(),
        }
    }

    /// Register a callback under a fresh id.
    pub(crate) fn insert<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(T) + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        let callback: SharedCallback<T> = Rc::new(RefCell::new(callback));
        self.callbacks.insert(id, callback);
        id
    }

    /// Remove a callback. Returns whether it was still registered.
    ///
    /// `shift_remove` keeps the firing order of the remaining callbacks.
    pub(crate) fn remove(&mut self, id: CallbackId) -> bool {
        self.callbacks.shift_remove(&id).is_some()
    }

    pub(crate) fn contains(&self, id: CallbackId) -> bool {
        self.callbacks.contains_key(&id)
    }

    /// The callbacks to run for one value transition, in registration order.
    pub(crate) fn snapshot(&self) -> Vec<(CallbackId, SharedCallback<T>)> {
        self.callbacks
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

/// Handle returned by [`ComputeCell::add_callback`](super::ComputeCell::add_callback).
///
/// Dropping the handle does **not** remove the callback; only [`cancel`](Self::cancel) does.
pub struct CancelHandle<T: CellValue> {
    graph: Shared<T>,
    cell: ComputeId,
    id: CallbackId,
}

impl<T: CellValue> CancelHandle<T> {
    pub(crate) fn new(graph: Shared<T>, cell: ComputeId, id: CallbackId) -> Self {
        Self { graph, cell, id }
    }

    /// Remove the callback from its compute cell.
    ///
    /// Cancelling an already cancelled callback does nothing.
    pub fn cancel(&self) {
        let removed = self.graph.borrow_mut().computes[self.cell.index()]
            .callbacks
            .remove(self.id);
        if removed {
            tracing::trace!(cell = self.cell.index(), callback = self.id.0, "callback cancelled");
        }
    }

    pub fn callback_id(&self) -> CallbackId {
        self.id
    }
}

impl<T: CellValue> Clone for CancelHandle<T> {
    fn clone(&self) -> Self {
        Self {
            graph: Rc::clone(&self.graph),
            cell: self.cell,
            id: self.id,
        }
    }
}

impl<T: CellValue> fmt::Debug for CancelHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cell", &self.cell)
            .field("id", &self.id)
            .finish()
    }
}
