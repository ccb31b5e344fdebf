//! Cellflow Core
//!
//! This crate provides a small reactive engine built from cells:
//!
//! - Input cells, holding values set by the client
//! - Compute cells, deriving values from other cells
//! - Callbacks, fired with a compute cell's new value whenever it changes
//!
//! Setting an input re-evaluates the compute cells that may depend on it,
//! the way a spreadsheet recalculates formulas.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: The reactor, cell handles and callback registration
//! - `graph`: Dependency edges between cells and sweep ordering
//! - `config`: Sweep strategy and reentrancy policy
//! - `error`: The error type returned by fallible operations
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cellflow_core::{Cell, Reactor};
//!
//! let reactor = Reactor::new();
//! let celsius = reactor.create_input(100);
//! let fahrenheit = reactor
//!     .create_compute1(&celsius, |c| c * 9 / 5 + 32)
//!     .unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! fahrenheit.add_callback(move |f| sink.borrow_mut().push(f));
//!
//! celsius.set_value(0).unwrap();
//! assert_eq!(fahrenheit.value(), 32);
//! assert_eq!(*seen.borrow(), vec![32]);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod reactive;

pub use config::{ReactorConfig, ReentrancyPolicy, SweepStrategy};
pub use error::{ReactorError, Result};
pub use graph::{CellId, ComputeId, InputId};
pub use reactive::{
    CallbackId, CancelHandle, Cell, CellValue, ComputeCell, InputCell, Reactor, ReactorId,
};
