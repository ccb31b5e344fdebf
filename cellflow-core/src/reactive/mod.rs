//! Reactive Cells
//!
//! This module implements the cells of a reactor and their propagation.
//!
//! # Concepts
//!
//! ## Input cells
//!
//! An [`InputCell`] holds a value set by the client. Setting a different
//! value re-evaluates the compute cells of the reactor before returning.
//!
//! ## Compute cells
//!
//! A [`ComputeCell`] derives its value from one or more source cells through
//! a pure function. Sources must exist before the cell that reads them, so
//! the graph can never contain a cycle.
//!
//! ## Callbacks
//!
//! A callback attached to a compute cell receives the cell's new value each
//! time that value changes. A re-evaluation that produces the same value
//! fires nothing. [`CancelHandle::cancel`] detaches a callback.
//!
//! # Implementation Notes
//!
//! Cells live in arenas owned by the reactor's shared graph state; handles
//! are an arena index plus a reference-counted pointer to that state. Compute
//! functions receive source values instead of capturing other cells, so the
//! graph has no reference cycles of its own.

mod callback;
mod compute;
mod context;
mod input;
mod reactor;

use std::fmt::Debug;

pub use callback::{CallbackId, CancelHandle};
pub use compute::ComputeCell;
pub use input::InputCell;
pub use reactor::{Reactor, ReactorId};

use crate::graph::CellId;

/// Values that can be stored in cells.
///
/// `PartialEq` drives change detection and `Debug` is used in logs.
pub trait CellValue: Clone + PartialEq + Debug + 'static {}

impl<T> CellValue for T where T: Clone + PartialEq + Debug + 'static {}

mod sealed {
    /// Only cells handed out by a reactor may be used as sources.
    pub trait Sealed {}
}

/// Any cell of a reactor: something with a current value.
///
/// The trait is sealed. Its only implementors are [`InputCell`] and
/// [`ComputeCell`], whose ids always point at a live arena slot of the
/// reactor that created them:
///
/// ```compile_fail
/// use cellflow_core::{Cell, CellId, InputId, Reactor, ReactorId};
///
/// struct Detached(ReactorId);
///
/// impl Cell<i32> for Detached {
///     fn value(&self) -> i32 {
///         0
///     }
///     fn cell_id(&self) -> CellId {
///         CellId::Input(InputId::from(99))
///     }
///     fn reactor_id(&self) -> ReactorId {
///         self.0
///     }
/// }
///
/// let reactor = Reactor::new();
/// let detached = Detached(reactor.id());
/// let _ = reactor.create_compute1(&detached, |v| v + 1);
/// ```
pub trait Cell<T: CellValue>: sealed::Sealed {
    /// The cell's current value.
    ///
    /// For a compute cell this re-evaluates against the sources' current
    /// values and may fire callbacks.
    fn value(&self) -> T;

    /// The cell's id within its reactor.
    fn cell_id(&self) -> CellId;

    /// The reactor that owns the cell.
    fn reactor_id(&self) -> ReactorId;
}
