//! Input Cells
//!
//! An input cell holds a value set directly by the client. Writing a value
//! that differs from the current one propagates to every compute cell before
//! `set_value` returns.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::reactor::{self, ReactorId, Shared};
use super::{Cell, CellValue};
use crate::error::Result;
use crate::graph::{CellId, InputId};

/// Handle to an input cell.
///
/// Clones refer to the same cell.
///
/// ```rust
/// use cellflow_core::{Cell, Reactor};
///
/// let reactor = Reactor::new();
/// let input = reactor.create_input(0);
/// input.set_value(5).unwrap();
/// assert_eq!(input.value(), 5);
/// ```
pub struct InputCell<T: CellValue> {
    graph: Shared<T>,
    reactor: ReactorId,
    id: InputId,
}

impl<T: CellValue> InputCell<T> {
    pub(crate) fn new(graph: Shared<T>, reactor: ReactorId, id: InputId) -> Self {
        Self { graph, reactor, id }
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    /// Store a new value.
    ///
    /// The value is stored first. If it differs from the previous value the
    /// reactor sweeps its compute cells, firing callbacks on every cell whose
    /// value changed, before this returns. Writing the current value again
    /// does nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`ReactorError::ReentrantMutation`](crate::ReactorError) when
    /// called from a callback during a sweep and the reactor uses
    /// [`ReentrancyPolicy::Reject`](crate::ReentrancyPolicy). Outside of
    /// callbacks this never fails.
    pub fn set_value(&self, value: T) -> Result<()> {
        debug!(cell = %CellId::from(self.id), value = ?value, "input written");
        reactor::write_input(&self.graph, self.id, value)
    }
}

impl<T: CellValue> super::sealed::Sealed for InputCell<T> {}

impl<T: CellValue> Cell<T> for InputCell<T> {
    fn value(&self) -> T {
        self.graph.borrow().inputs[self.id.index()].clone()
    }

    fn cell_id(&self) -> CellId {
        self.id.into()
    }

    fn reactor_id(&self) -> ReactorId {
        self.reactor
    }
}

impl<T: CellValue> Clone for InputCell<T> {
    fn clone(&self) -> Self {
        Self {
            graph: Rc::clone(&self.graph),
            reactor: self.reactor,
            id: self.id,
        }
    }
}

impl<T: CellValue> fmt::Debug for InputCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputCell")
            .field("id", &self.id)
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cell, Reactor};

    #[test]
    fn input_get_and_set() {
        let reactor = Reactor::new();
        let input = reactor.create_input(0);
        assert_eq!(input.value(), 0);

        input.set_value(42).unwrap();
        assert_eq!(input.value(), 42);
    }

    #[test]
    fn clone_shares_state() {
        let reactor = Reactor::new();
        let input1 = reactor.create_input(0);
        let input2 = input1.clone();

        input1.set_value(42).unwrap();
        assert_eq!(input2.value(), 42);

        input2.set_value(100).unwrap();
        assert_eq!(input1.value(), 100);
    }

    #[test]
    fn ids_follow_creation_order() {
        let reactor = Reactor::new();
        let a = reactor.create_input(0);
        let b = reactor.create_input(0);

        assert_eq!(a.id().index(), 0);
        assert_eq!(b.id().index(), 1);
        assert_eq!(b.cell_id().to_string(), "input#1");
    }

    #[test]
    fn handles_outlive_the_reactor() {
        let input = {
            let reactor = Reactor::new();
            reactor.create_input(7)
        };
        input.set_value(8).unwrap();
        assert_eq!(input.value(), 8);
    }

    #[test]
    fn works_with_non_integer_values() {
        let reactor = Reactor::new();
        let name = reactor.create_input(String::from("cell"));
        let shout = reactor.create_compute1(&name, |s| s.to_uppercase()).unwrap();

        name.set_value(String::from("flow")).unwrap();
        assert_eq!(shout.value(), "FLOW");
    }
}
