//! Top-level run state machine.
//!
//! Drives the [`JobDispatcher`] and [`ResultCollector`] in a loop against a
//! shared advisor and channel, enforcing the trial budget and the wall-clock
//! deadline, and producing the terminal [`RunHistory`].

use std::time::Instant;
use tracing::{debug, info, warn};

use ps_advisor::Advisor;
use ps_types::{PsResult, RunHistory};

use crate::channel::MessageChannel;
use crate::collector::ResultCollector;
use crate::config::{ExecutionStrategy, RunConfig};
use crate::dispatcher::JobDispatcher;

/// Where the controller is in its dispatch/collect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Dispatching,
    Waiting,
    Done,
}

/// The orchestrator. Generic over the advisor and channel implementations so
/// callers can plug in a surrogate-driven advisor and a distributed channel,
/// or scripted doubles for tests.
///
/// Single-threaded and cooperative: the only suspension point is the timed
/// channel receive, so the controller never holds a lock and never races its
/// own collaborators. Hitting the deadline or the trial budget are both
/// normal termination, never errors.
pub struct RunController<A: Advisor, C: MessageChannel> {
    advisor: A,
    channel: C,
    config: RunConfig,
    history: RunHistory,
    state: RunState,
}

impl<A: Advisor, C: MessageChannel> RunController<A, C> {
    /// Create a controller. Fails fast on a malformed configuration — no
    /// job is dispatched from an invalid run.
    pub fn new(advisor: A, channel: C, config: RunConfig) -> PsResult<Self> {
        config.validate()?;
        Ok(Self {
            advisor,
            channel,
            config,
            history: RunHistory::new(),
            state: RunState::Dispatching,
        })
    }

    /// Current state of the run cycle.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run to completion and return the trial log, the run's
    /// sole artifact. Outstanding jobs at deadline expiry are abandoned:
    /// no cancellation is sent and their results never enter the log.
    pub fn run(mut self) -> PsResult<RunHistory> {
        let started_at = Instant::now();
        let mut dispatcher = JobDispatcher::new(
            self.config.batch_size,
            self.config.max_trials,
            self.config.trial_time_limit,
        );
        let mut collector = ResultCollector::new(self.config.num_objectives, started_at);

        info!(
            strategy = ?self.config.strategy,
            max_trials = self.config.max_trials,
            batch_size = self.config.batch_size,
            max_runtime = ?self.config.max_runtime,
            "run started"
        );

        match self.config.strategy {
            ExecutionStrategy::Asynchronous => {
                self.run_streaming(&mut dispatcher, &mut collector, started_at)?
            }
            ExecutionStrategy::Synchronous => {
                self.run_lockstep(&mut dispatcher, &mut collector, started_at)?
            }
        }

        self.state = RunState::Done;
        info!(
            resolved = collector.resolved(),
            dispatched = dispatcher.dispatched(),
            elapsed = ?started_at.elapsed(),
            "run finished"
        );
        Ok(self.history)
    }

    /// Streaming strategy: top up the queue whenever the running set dips
    /// below the batch size, drain whatever has arrived, and park for one
    /// poll interval when nothing has. The deadline is re-checked after
    /// every drained batch, even an empty one.
    fn run_streaming(
        &mut self,
        dispatcher: &mut JobDispatcher,
        collector: &mut ResultCollector,
        started_at: Instant,
    ) -> PsResult<()> {
        while collector.resolved() < self.config.max_trials {
            self.state = RunState::Dispatching;
            dispatcher.fill_queue(&mut self.advisor, &self.channel)?;

            self.state = RunState::Waiting;
            let drained =
                collector.drain_available(&mut self.advisor, &self.channel, &mut self.history);
            if drained == 0 {
                if let Some(observation) =
                    self.channel.receive_timeout(self.config.poll_interval)
                {
                    collector.resolve(observation, &mut self.advisor, &mut self.history);
                }
            }

            if started_at.elapsed() >= self.config.max_runtime {
                warn!(
                    resolved = collector.resolved(),
                    outstanding = self.advisor.running_configs().len(),
                    "deadline reached, abandoning outstanding trials"
                );
                return Ok(());
            }
        }
        Ok(())
    }

    /// Lockstep strategy: one batch per round, fully resolved before the
    /// next round starts; the deadline is checked once per completed round.
    /// An extra round is planned when the batch size exceeds the advisor's
    /// initial design, so an oversized first batch cannot starve the budget;
    /// the round simply dispatches nothing once the budget is spent.
    fn run_lockstep(
        &mut self,
        dispatcher: &mut JobDispatcher,
        collector: &mut ResultCollector,
        started_at: Instant,
    ) -> PsResult<()> {
        let mut rounds = self.config.max_trials.div_ceil(self.config.batch_size);
        if self.config.batch_size > self.advisor.init_design_count() {
            rounds += 1;
        }

        for round in 0..rounds {
            self.state = RunState::Dispatching;
            let sent = dispatcher.dispatch_round(&mut self.advisor, &self.channel)?;
            if sent == 0 {
                break;
            }
            debug!(round, sent, "round dispatched");

            self.state = RunState::Waiting;
            let mut outstanding = sent;
            while outstanding > 0 {
                let drained =
                    collector.drain_available(&mut self.advisor, &self.channel, &mut self.history);
                outstanding = outstanding.saturating_sub(drained);
                if outstanding > 0 {
                    if let Some(observation) =
                        self.channel.receive_timeout(self.config.poll_interval)
                    {
                        collector.resolve(observation, &mut self.advisor, &mut self.history);
                        outstanding -= 1;
                    }
                }
            }

            if started_at.elapsed() >= self.config.max_runtime {
                warn!(
                    round,
                    resolved = collector.resolved(),
                    "deadline reached after round"
                );
                return Ok(());
            }
        }
        Ok(())
    }
}
