//! Reactor Configuration
//!
//! A reactor has two knobs: how it sweeps compute cells after an input
//! changes, and what it does when a callback writes to an input while that
//! sweep is still running.
//!
//! Both derive `serde` traits so a host application can keep them in its
//! own configuration file:
//!
//! ```rust
//! use cellflow_core::{ReactorConfig, ReentrancyPolicy, SweepStrategy};
//!
//! let config: ReactorConfig =
//!     serde_json::from_str(r#"{ "sweep": "affected", "reentrancy": "defer" }"#).unwrap();
//! assert_eq!(config.sweep, SweepStrategy::Affected);
//! assert_eq!(config.reentrancy, ReentrancyPolicy::Defer);
//! ```

use serde::{Deserialize, Serialize};

/// Which compute cells are re-evaluated after an input changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStrategy {
    /// Visit every compute cell in creation order.
    ///
    /// Costs O(compute cells) per change but needs no dependency analysis.
    #[default]
    Full,

    /// Visit only the transitive dependents of the changed input, sources
    /// before dependents.
    Affected,
}

/// What happens when an input is written while a sweep is running.
///
/// This only arises when a callback writes to the graph that invoked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentrancyPolicy {
    /// Refuse the write with [`ReactorError::ReentrantMutation`](crate::ReactorError).
    /// The input keeps its old value.
    #[default]
    Reject,

    /// Queue the write and apply it once the current sweep finishes.
    /// Queued writes are applied in the order they were issued.
    Defer,
}

/// Configuration for a [`Reactor`](crate::Reactor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Sweep strategy used after each input change.
    pub sweep: SweepStrategy,

    /// Policy for writes issued from inside callbacks.
    pub reentrancy: ReentrancyPolicy,
}

impl ReactorConfig {
    /// Create the default configuration: full sweeps, reentrant writes rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep strategy.
    pub fn with_sweep(mut self, sweep: SweepStrategy) -> Self {
        self.sweep = sweep;
        self
    }

    /// Set the reentrancy policy.
    pub fn with_reentrancy(mut self, reentrancy: ReentrancyPolicy) -> Self {
        self.reentrancy = reentrancy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ReactorConfig::new();
        assert_eq!(config.sweep, SweepStrategy::Full);
        assert_eq!(config.reentrancy, ReentrancyPolicy::Reject);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = ReactorConfig::new()
            .with_sweep(SweepStrategy::Affected)
            .with_reentrancy(ReentrancyPolicy::Defer);
        assert_eq!(config.sweep, SweepStrategy::Affected);
        assert_eq!(config.reentrancy, ReentrancyPolicy::Defer);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ReactorConfig = serde_json::from_str(r#"{ "sweep": "affected" }"#).unwrap();
        assert_eq!(config.sweep, SweepStrategy::Affected);
        assert_eq!(config.reentrancy, ReentrancyPolicy::Reject);

        let config: ReactorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReactorConfig::default());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = serde_json::from_str::<ReactorConfig>(r#"{ "sweep": "lazy" }"#);
        assert!(result.is_err());
    }
}
