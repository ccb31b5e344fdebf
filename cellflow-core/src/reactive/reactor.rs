//! Reactor
//!
//! The reactor owns every cell of one graph and coordinates propagation.
//!
//! # How It Works
//!
//! 1. Inputs and compute cells live in two arenas inside a shared graph
//!    state. Client-facing handles carry an arena index plus a reference to
//!    that state, never a reference to another cell.
//!
//! 2. When a compute cell is created its sources are recorded as edges in
//!    the [`UpdateScheduler`] and its first value is computed on the spot.
//!
//! 3. When an input's value actually changes, the reactor sweeps compute
//!    cells: every cell in creation order ([`SweepStrategy::Full`]) or only
//!    the cells downstream of that input ([`SweepStrategy::Affected`]).
//!    Each visited cell re-evaluates and fires its callbacks if its value
//!    moved.
//!
//! 4. Writes issued by callbacks during a sweep are rejected or queued,
//!    depending on [`ReentrancyPolicy`].
//!
//! # Threading
//!
//! A reactor is single-threaded. All state is behind `Rc<RefCell<..>>`, and
//! no borrow of it is held while client code (compute functions or
//! callbacks) runs, so client code may read any cell.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::compute::{self, ComputeCell, ComputeSlot};
use super::context::SweepContext;
use super::input::InputCell;
use super::{Cell, CellValue};
use crate::config::{ReactorConfig, ReentrancyPolicy, SweepStrategy};
use crate::error::{ReactorError, Result};
use crate::graph::{CellId, ComputeId, InputId, Node, UpdateScheduler};

/// Counter for generating unique reactor IDs.
static REACTOR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of a reactor.
///
/// Used to reject cells that belong to a different reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReactorId(u64);

impl ReactorId {
    fn next() -> Self {
        Self(REACTOR_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Graph state shared by a reactor and all of its handles.
pub(crate) type Shared<T> = Rc<RefCell<Graph<T>>>;

pub(crate) struct Graph<T: CellValue> {
    pub(crate) id: ReactorId,
    pub(crate) config: ReactorConfig,

    /// Current input values, indexed by `InputId`.
    pub(crate) inputs: Vec<T>,

    /// Compute cells, indexed by `ComputeId` (creation order).
    pub(crate) computes: Vec<ComputeSlot<T>>,

    pub(crate) scheduler: UpdateScheduler,

    /// Set while a sweep is running. See [`SweepContext`].
    pub(crate) sweeping: bool,

    /// Writes deferred under [`ReentrancyPolicy::Defer`].
    pub(crate) pending: VecDeque<(InputId, T)>,
}

impl<T: CellValue> Graph<T> {
    pub(crate) fn new(config: ReactorConfig) -> Self {
        Self {
            id: ReactorId::next(),
            config,
            inputs: Vec::new(),
            computes: Vec::new(),
            scheduler: UpdateScheduler::new(),
            sweeping: false,
            pending: VecDeque::new(),
        }
    }

    /// Store an input value. Returns whether it differs from the old one.
    fn store(&mut self, id: InputId, value: T) -> bool {
        let slot = &mut self.inputs[id.index()];
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// The compute cells to visit after `input` changed, in visiting order.
    fn sweep_order(&self, input: InputId) -> Vec<ComputeId> {
        match self.config.sweep {
            SweepStrategy::Full => (0..self.computes.len()).map(ComputeId::from).collect(),
            SweepStrategy::Affected => self.scheduler.affected_by(input.into()),
        }
    }
}

/// Read the current value of any cell, re-evaluating compute cells.
pub(crate) fn read<T: CellValue>(graph: &Shared<T>, id: CellId) -> T {
    match id {
        CellId::Input(input) => graph.borrow().inputs[input.index()].clone(),
        CellId::Compute(cell) => compute::evaluate(graph, cell),
    }
}

/// Write an input value and propagate it.
pub(crate) fn write_input<T: CellValue>(graph: &Shared<T>, id: InputId, value: T) -> Result<()> {
    if SweepContext::is_active(graph) {
        let cell = CellId::from(id);
        let mut state = graph.borrow_mut();
        match state.config.reentrancy {
            ReentrancyPolicy::Reject => {
                warn!(%cell, value = ?value, "rejected write issued during a sweep");
                return Err(ReactorError::ReentrantMutation { cell });
            }
            ReentrancyPolicy::Defer => {
                debug!(%cell, value = ?value, "deferring write until the sweep ends");
                state.pending.push_back((id, value));
                return Ok(());
            }
        }
    }

    let _ctx = SweepContext::enter(graph);
    let mut next = Some((id, value));

    while let Some((id, value)) = next {
        let changed = graph.borrow_mut().store(id, value);
        if changed {
            sweep(graph, id);
        }
        next = graph.borrow_mut().pending.pop_front();
    }

    Ok(())
}

/// Re-evaluate the compute cells that may depend on `input`.
fn sweep<T: CellValue>(graph: &Shared<T>, input: InputId) {
    let (order, strategy) = {
        let state = graph.borrow();
        (state.sweep_order(input), state.config.sweep)
    };

    debug!(
        input = %CellId::from(input),
        ?strategy,
        cells = order.len(),
        "sweeping compute cells"
    );

    for cell in order {
        compute::evaluate(graph, cell);
    }
}

/// The owner of one reactive graph.
///
/// ```rust
/// use cellflow_core::{Cell, Reactor};
///
/// let reactor = Reactor::new();
/// let a = reactor.create_input(1);
/// let b = reactor.create_input(2);
/// let sum = reactor.create_compute2(&a, &b, |x, y| x + y).unwrap();
/// assert_eq!(sum.value(), 3);
///
/// a.set_value(3).unwrap();
/// assert_eq!(sum.value(), 5);
/// ```
pub struct Reactor<T: CellValue> {
    graph: Shared<T>,
}

impl<T: CellValue> Reactor<T> {
    /// Create a reactor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReactorConfig::default())
    }

    /// Create a reactor with the given configuration.
    pub fn with_config(config: ReactorConfig) -> Self {
        Self {
            graph: Rc::new(RefCell::new(Graph::new(config))),
        }
    }

    /// The reactor's unique id, shared by every cell it creates.
    pub fn id(&self) -> ReactorId {
        self.graph.borrow().id
    }

    /// The configuration this reactor was created with.
    pub fn config(&self) -> ReactorConfig {
        self.graph.borrow().config
    }

    /// Create an input cell holding `initial`.
    pub fn create_input(&self, initial: T) -> InputCell<T> {
        let mut state = self.graph.borrow_mut();
        let id = InputId::from(state.inputs.len());
        state.inputs.push(initial);
        state.scheduler.add_node(Node::new(id.into()));
        let reactor = state.id;
        drop(state);

        InputCell::new(Rc::clone(&self.graph), reactor, id)
    }

    /// Create a compute cell reading one source.
    pub fn create_compute1<C, F>(&self, source: &C, f: F) -> Result<ComputeCell<T>>
    where
        C: Cell<T>,
        F: Fn(T) -> T + 'static,
    {
        let sources: [&dyn Cell<T>; 1] = [source];
        self.create_compute(&sources, move |values| f(values[0].clone()))
    }

    /// Create a compute cell reading two sources.
    pub fn create_compute2<A, B, F>(&self, first: &A, second: &B, f: F) -> Result<ComputeCell<T>>
    where
        A: Cell<T>,
        B: Cell<T>,
        F: Fn(T, T) -> T + 'static,
    {
        let sources: [&dyn Cell<T>; 2] = [first, second];
        self.create_compute(&sources, move |values| {
            f(values[0].clone(), values[1].clone())
        })
    }

    /// Create a compute cell reading any number of sources.
    ///
    /// `f` receives the sources' current values in the order given. The cell
    /// is evaluated once here, and that value is the baseline for its first
    /// change notification.
    ///
    /// # Errors
    ///
    /// - [`ReactorError::NoSources`] if `sources` is empty
    /// - [`ReactorError::ForeignCell`] if a source belongs to another reactor
    pub fn create_compute<F>(&self, sources: &[&dyn Cell<T>], f: F) -> Result<ComputeCell<T>>
    where
        F: Fn(&[T]) -> T + 'static,
    {
        if sources.is_empty() {
            return Err(ReactorError::NoSources);
        }

        let reactor = self.id();
        let mut ids: SmallVec<[CellId; 2]> = SmallVec::with_capacity(sources.len());
        for source in sources {
            if source.reactor_id() != reactor {
                return Err(ReactorError::ForeignCell {
                    cell: source.cell_id(),
                });
            }
            ids.push(source.cell_id());
        }

        let values: SmallVec<[T; 2]> = ids.iter().map(|&id| read(&self.graph, id)).collect();
        let initial = f(values.as_slice());

        let mut state = self.graph.borrow_mut();
        let id = ComputeId::from(state.computes.len());
        state.scheduler.add_node(Node::new(id.into()));
        for &source in &ids {
            state.scheduler.add_edge(source, id.into());
        }
        debug!(cell = %CellId::from(id), sources = ?ids.as_slice(), value = ?initial, "compute cell created");
        state.computes.push(ComputeSlot::new(ids, Rc::new(f), initial));
        drop(state);

        Ok(ComputeCell::new(Rc::clone(&self.graph), reactor, id))
    }

    /// The compute cells reading directly from `cell`, in creation order.
    pub fn dependents_of<C: Cell<T>>(&self, cell: &C) -> Vec<CellId> {
        let state = self.graph.borrow();
        if cell.reactor_id() != state.id {
            return Vec::new();
        }
        state
            .scheduler
            .get_node(cell.cell_id())
            .map(|node| node.dependents().iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of input cells created so far.
    pub fn input_count(&self) -> usize {
        self.graph.borrow().inputs.len()
    }

    /// Number of compute cells created so far.
    pub fn compute_count(&self) -> usize {
        self.graph.borrow().computes.len()
    }
}

impl<T: CellValue> Default for Reactor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CellValue> fmt::Debug for Reactor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.graph.borrow();
        f.debug_struct("Reactor")
            .field("id", &state.id)
            .field("config", &state.config)
            .field("inputs", &state.inputs.len())
            .field("computes", &state.computes.len())
            .finish()
    }
}
