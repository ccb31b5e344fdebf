//! Dependency Graph
//!
//! This module records which cells read from which, so a reactor can find
//! the compute cells affected by a change to one input.
//!
//! # Overview
//!
//! The dependency graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes are input cells or compute cells
//! - Edges point from a source cell to each compute cell that reads it
//!
//! The graph is acyclic by construction: a compute cell can only name
//! sources that already exist, so no edge can ever close a loop.
//!
//! # Design Decisions
//!
//! 1. Nodes are stored in two arenas (inputs and computes) indexed by the
//!    cell's arena index, giving O(1) lookups without hashing.
//!
//! 2. Both forward (dependencies) and reverse (dependents) edges are kept,
//!    so the graph can be walked in either direction.

mod node;
mod scheduler;

pub use node::{CellId, ComputeId, InputId, Node};
pub use scheduler::UpdateScheduler;
