//! Update Scheduler
//!
//! The scheduler owns the dependency graph and answers one question for the
//! reactor: which compute cells must be revisited when a given input changes,
//! and in what order.
//!
//! # Algorithm
//!
//! 1. Walk the dependents of the changed input breadth-first, collecting
//!    every compute cell reachable from it
//! 2. Sort the collected cells topologically (dependencies before dependents)
//!    using Kahn's algorithm, restricted to the collected set
//! 3. Among cells that are ready at the same time, the one created first goes
//!    first, so the order matches what a full creation-order sweep would do

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use super::node::{CellId, ComputeId, Node};

/// The update scheduler manages the dependency graph of one reactor.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    /// Input nodes, indexed by `InputId`.
    inputs: Vec<Node>,

    /// Compute nodes, indexed by `ComputeId`.
    computes: Vec<Node>,
}

impl UpdateScheduler {
    /// Create a new empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph.
    ///
    /// Nodes must be added in arena order: the node for `input#n` or
    /// `compute#n` is the n-th node of its kind.
    pub fn add_node(&mut self, node: Node) -> CellId {
        let id = node.id();
        let arena = match id {
            CellId::Input(_) => &mut self.inputs,
            CellId::Compute(_) => &mut self.computes,
        };
        debug_assert_eq!(
            match id {
                CellId::Input(i) => i.index(),
                CellId::Compute(c) => c.index(),
            },
            arena.len(),
            "nodes must be added in arena order"
        );
        arena.push(node);
        id
    }

    /// Get a reference to a node.
    pub fn get_node(&self, id: CellId) -> Option<&Node> {
        match id {
            CellId::Input(i) => self.inputs.get(i.index()),
            CellId::Compute(c) => self.computes.get(c.index()),
        }
    }

    fn get_node_mut(&mut self, id: CellId) -> Option<&mut Node> {
        match id {
            CellId::Input(i) => self.inputs.get_mut(i.index()),
            CellId::Compute(c) => self.computes.get_mut(c.index()),
        }
    }

    /// Add a dependency edge: `dependent` reads from `dependency`.
    pub fn add_edge(&mut self, dependency: CellId, dependent: CellId) {
        if let Some(node) = self.get_node_mut(dependency) {
            node.add_dependent(dependent);
        }
        if let Some(node) = self.get_node_mut(dependent) {
            node.add_dependency(dependency);
        }
    }

    /// Every compute cell transitively reading from `source`, ordered so
    /// that each cell comes after all of its affected sources.
    pub fn affected_by(&self, source: CellId) -> Vec<ComputeId> {
        let mut affected = HashSet::new();
        let mut queue = VecDeque::new();

        if let Some(node) = self.get_node(source) {
            queue.extend(node.dependents().iter().copied());
        }

        while let Some(id) = queue.pop_front() {
            let CellId::Compute(compute) = id else {
                continue;
            };
            if !affected.insert(compute) {
                continue;
            }
            if let Some(node) = self.get_node(id) {
                queue.extend(node.dependents().iter().copied());
            }
        }

        self.topological_sort(&affected)
    }

    /// Kahn's algorithm over the given subset of compute cells.
    fn topological_sort(&self, cells: &HashSet<ComputeId>) -> Vec<ComputeId> {
        let mut in_degree: HashMap<ComputeId, usize> = HashMap::with_capacity(cells.len());
        let mut ready = BinaryHeap::new();
        let mut result = Vec::with_capacity(cells.len());

        // Only edges inside the subset count
        for &id in cells {
            let degree = self.computes[id.index()]
                .dependencies()
                .iter()
                .filter(|dep| matches!(dep, CellId::Compute(c) if cells.contains(c)))
                .count();
            in_degree.insert(id, degree);
            if degree == 0 {
                ready.push(Reverse(id));
            }
        }

        while let Some(Reverse(id)) = ready.pop() {
            result.push(id);

            for dependent in self.computes[id.index()].dependents() {
                let CellId::Compute(dependent) = dependent else {
                    continue;
                };
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        ready.push(Reverse(*dependent));
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::InputId;

    fn input(scheduler: &mut UpdateScheduler) -> CellId {
        let id = InputId::from(scheduler.inputs.len());
        scheduler.add_node(Node::new(id.into()))
    }

    fn compute(scheduler: &mut UpdateScheduler, sources: &[CellId]) -> CellId {
        let id = CellId::from(ComputeId::from(scheduler.computes.len()));
        scheduler.add_node(Node::new(id));
        for &source in sources {
            scheduler.add_edge(source, id);
        }
        id
    }

    fn ids(cells: &[CellId]) -> Vec<ComputeId> {
        cells
            .iter()
            .map(|id| match id {
                CellId::Compute(c) => *c,
                CellId::Input(_) => panic!("not a compute cell"),
            })
            .collect()
    }

    #[test]
    fn add_nodes_and_edges() {
        let mut scheduler = UpdateScheduler::new();
        let source = input(&mut scheduler);
        let derived = compute(&mut scheduler, &[source]);

        assert_eq!(scheduler.inputs.len(), 1);
        assert_eq!(scheduler.computes.len(), 1);
        assert!(scheduler
            .get_node(source)
            .unwrap()
            .dependents()
            .contains(&derived));
        assert!(scheduler
            .get_node(derived)
            .unwrap()
            .dependencies()
            .contains(&source));
    }

    #[test]
    fn chain_is_ordered_source_first() {
        let mut scheduler = UpdateScheduler::new();
        let source = input(&mut scheduler);
        let first = compute(&mut scheduler, &[source]);
        let second = compute(&mut scheduler, &[first]);
        let third = compute(&mut scheduler, &[second]);

        assert_eq!(
            scheduler.affected_by(source),
            ids(&[first, second, third])
        );
    }

    #[test]
    fn unrelated_cells_are_not_affected() {
        let mut scheduler = UpdateScheduler::new();
        let a = input(&mut scheduler);
        let b = input(&mut scheduler);
        let from_a = compute(&mut scheduler, &[a]);
        let _from_b = compute(&mut scheduler, &[b]);
        let both = compute(&mut scheduler, &[a, b]);

        assert_eq!(scheduler.affected_by(a), ids(&[from_a, both]));
    }

    #[test]
    fn diamond_visits_each_cell_once() {
        let mut scheduler = UpdateScheduler::new();
        let source = input(&mut scheduler);
        let left = compute(&mut scheduler, &[source]);
        let right = compute(&mut scheduler, &[source]);
        let join = compute(&mut scheduler, &[left, right]);

        assert_eq!(scheduler.affected_by(source), ids(&[left, right, join]));
    }

    #[test]
    fn input_without_dependents_affects_nothing() {
        let mut scheduler = UpdateScheduler::new();
        let source = input(&mut scheduler);
        assert!(scheduler.affected_by(source).is_empty());
    }
}
