//! Run configuration and start-time validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use ps_types::{validation_error, PsResult};

/// How the controller overlaps dispatch and collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// One batch per round; every trial of a round resolves before the next
    /// round is dispatched.
    Synchronous,
    /// Streaming: the queue is topped up whenever the running set dips below
    /// the batch size.
    Asynchronous,
}

/// Top-level configuration for an optimization run. All values are fixed at
/// run start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of trials to resolve.
    pub max_trials: usize,

    /// Wall-clock deadline for the whole run.
    pub max_runtime: Duration,

    /// Concurrency limit: maximum number of outstanding trials.
    pub batch_size: usize,

    /// Per-trial time limit carried on each job (enforced by workers).
    pub trial_time_limit: Duration,

    /// How long the controller parks waiting for a result before re-checking
    /// the deadline.
    pub poll_interval: Duration,

    /// Length of the performance vector; also sizes the sentinel
    /// failed-performance value.
    pub num_objectives: usize,

    pub strategy: ExecutionStrategy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_trials: 100,
            max_runtime: Duration::from_secs(3600),
            batch_size: 4,
            trial_time_limit: Duration::from_secs(180),
            poll_interval: Duration::from_millis(100),
            num_objectives: 1,
            strategy: ExecutionStrategy::Asynchronous,
        }
    }
}

impl RunConfig {
    pub fn new(max_trials: usize, batch_size: usize) -> Self {
        Self {
            max_trials,
            batch_size,
            ..Self::default()
        }
    }

    pub fn with_max_runtime(mut self, max_runtime: Duration) -> Self {
        self.max_runtime = max_runtime;
        self
    }

    pub fn with_trial_time_limit(mut self, limit: Duration) -> Self {
        self.trial_time_limit = limit;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_num_objectives(mut self, n: usize) -> Self {
        self.num_objectives = n;
        self
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reject malformed parameters before any dispatch occurs.
    pub fn validate(&self) -> PsResult<()> {
        if self.max_trials == 0 {
            return Err(validation_error!("max_trials must be positive"));
        }
        if self.batch_size == 0 {
            return Err(validation_error!("batch_size must be positive"));
        }
        if self.num_objectives == 0 {
            return Err(validation_error!("num_objectives must be positive"));
        }
        if self.max_runtime.is_zero() {
            return Err(validation_error!("max_runtime must be positive"));
        }
        if self.trial_time_limit.is_zero() {
            return Err(validation_error!("trial_time_limit must be positive"));
        }
        if self.poll_interval.is_zero() {
            return Err(validation_error!("poll_interval must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_fatal() {
        let config = RunConfig::new(10, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_trial_budget_is_fatal() {
        let config = RunConfig::new(0, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_poll_interval_is_fatal() {
        let config = RunConfig::new(10, 4).with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_chain_overrides_defaults() {
        let config = RunConfig::new(50, 8)
            .with_max_runtime(Duration::from_secs(120))
            .with_strategy(ExecutionStrategy::Synchronous)
            .with_num_objectives(2);
        assert_eq!(config.max_trials, 50);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.strategy, ExecutionStrategy::Synchronous);
        assert_eq!(config.num_objectives, 2);
    }
}
