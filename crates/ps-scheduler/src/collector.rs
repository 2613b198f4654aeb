//! Drains worker observations, normalizes failures, and feeds the advisor.

use std::time::Instant;
use tracing::{debug, warn};

use ps_advisor::Advisor;
use ps_types::{Observation, RunHistory};

use crate::channel::MessageChannel;

/// Consumes observations from the channel and resolves them: failure
/// normalization, advisor update, history append.
///
/// A failed evaluation is recorded under a fixed, configuration-independent
/// worst-case performance rather than a distinguishable failure marker, so
/// the advisor's accounting always receives a performance and the trial
/// still counts toward the budget. No retries: each trial resolves once.
#[derive(Debug)]
pub struct ResultCollector {
    failed_perf: Vec<f64>,
    started_at: Instant,
    resolved: usize,
}

impl ResultCollector {
    pub fn new(num_objectives: usize, started_at: Instant) -> Self {
        Self {
            failed_perf: vec![f64::MAX; num_objectives],
            started_at,
            resolved: 0,
        }
    }

    /// Trials resolved so far.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Drain everything currently queued without blocking. Returns the
    /// number of observations resolved.
    pub fn drain_available<A, C>(
        &mut self,
        advisor: &mut A,
        channel: &C,
        history: &mut RunHistory,
    ) -> usize
    where
        A: Advisor,
        C: MessageChannel,
    {
        let mut drained = 0;
        while let Some(observation) = channel.try_receive() {
            self.resolve(observation, advisor, history);
            drained += 1;
        }
        drained
    }

    /// Resolve a single observation: substitute the sentinel performance on
    /// failure, tell the advisor (which removes the configuration from its
    /// running set), and append to the history with the elapsed run time.
    pub fn resolve<A>(&mut self, observation: Observation, advisor: &mut A, history: &mut RunHistory)
    where
        A: Advisor,
    {
        let Observation {
            config,
            objectives,
            elapsed: eval_elapsed,
            worker_id,
            message,
        } = observation;

        let performance = match objectives {
            Some(objectives) => objectives,
            None => {
                warn!(
                    config = %config.id,
                    cause = message.as_deref().unwrap_or("unreported"),
                    "evaluation failed, recording sentinel performance"
                );
                self.failed_perf.clone()
            }
        };

        advisor.observe(&config, &performance);
        self.resolved += 1;

        debug!(
            resolved = self.resolved,
            config = %config.id,
            worker = worker_id.as_deref().unwrap_or("unknown"),
            eval_elapsed = ?eval_elapsed,
            "observation resolved"
        );

        history.record(config, performance, self.started_at.elapsed());
    }
}
