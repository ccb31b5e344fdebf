//! Graph Nodes
//!
//! This module defines the identifiers for cells and the node type that
//! records each cell's edges in the dependency graph.

use std::fmt;

use indexmap::IndexSet;

/// Arena index of an input cell within its reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(usize);

impl InputId {
    /// Get the raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for InputId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Arena index of a compute cell within its reactor.
///
/// Compute ids are handed out in creation order, so comparing two ids
/// compares their creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComputeId(usize);

impl ComputeId {
    /// Get the raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ComputeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Identifier of any cell in a reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellId {
    Input(InputId),
    Compute(ComputeId),
}

impl From<InputId> for CellId {
    fn from(id: InputId) -> Self {
        CellId::Input(id)
    }
}

impl From<ComputeId> for CellId {
    fn from(id: ComputeId) -> Self {
        CellId::Compute(id)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellId::Input(id) => write!(f, "input#{}", id.0),
            CellId::Compute(id) => write!(f, "compute#{}", id.0),
        }
    }
}

/// A node in the dependency graph.
///
/// Edge sets keep insertion order so every traversal of the graph is
/// deterministic.
#[derive(Debug)]
pub struct Node {
    id: CellId,

    /// Cells this node reads from.
    dependencies: IndexSet<CellId>,

    /// Cells that read from this node.
    dependents: IndexSet<CellId>,
}

impl Node {
    /// Create a node for the given cell with no edges.
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            dependencies: IndexSet::new(),
            dependents: IndexSet::new(),
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    /// Add a dependency (a cell that this node reads from).
    pub fn add_dependency(&mut self, id: CellId) {
        self.dependencies.insert(id);
    }

    pub fn dependencies(&self) -> &IndexSet<CellId> {
        &self.dependencies
    }

    /// Add a dependent (a cell that reads from this node).
    pub fn add_dependent(&mut self, id: CellId) {
        self.dependents.insert(id);
    }

    pub fn dependents(&self) -> &IndexSet<CellId> {
        &self.dependents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ids_display_arena_and_index() {
        assert_eq!(CellId::from(InputId::from(2)).to_string(), "input#2");
        assert_eq!(CellId::from(ComputeId::from(7)).to_string(), "compute#7");
    }

    #[test]
    fn edges_keep_insertion_order_and_ignore_duplicates() {
        let mut node = Node::new(ComputeId::from(5).into());
        let a = CellId::from(InputId::from(1));
        let b = CellId::from(ComputeId::from(0));

        node.add_dependency(a);
        node.add_dependency(b);
        node.add_dependency(a);

        let deps: Vec<_> = node.dependencies().iter().copied().collect();
        assert_eq!(deps, vec![a, b]);
        assert!(node.dependents().is_empty());
    }
}
