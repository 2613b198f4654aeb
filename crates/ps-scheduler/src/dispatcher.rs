//! Job admission: turns advisor suggestions into dispatched jobs.

use std::time::Duration;
use tracing::{debug, info};

use ps_advisor::Advisor;
use ps_types::{PsResult, TrialJob};

use crate::channel::MessageChannel;

/// Decides when to pull suggestions from the advisor and push them onto the
/// channel, bounded by the batch size and the global trial budget.
///
/// The dispatched counter is an instance field, so independent sessions can
/// run side by side without interfering.
#[derive(Debug)]
pub struct JobDispatcher {
    batch_size: usize,
    max_trials: usize,
    trial_time_limit: Duration,
    dispatched: usize,
}

impl JobDispatcher {
    pub fn new(batch_size: usize, max_trials: usize, trial_time_limit: Duration) -> Self {
        Self {
            batch_size,
            max_trials,
            trial_time_limit,
            dispatched: 0,
        }
    }

    /// Trials dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Whether the trial budget is fully dispatched.
    pub fn budget_exhausted(&self) -> bool {
        self.dispatched >= self.max_trials
    }

    /// Streaming-mode admission: ask for configurations one at a time until
    /// the advisor's running set reaches the batch size or the budget is
    /// spent. The running-set size is the sole backpressure signal bounding
    /// outstanding work. Returns the number of jobs sent.
    pub fn fill_queue<A, C>(&mut self, advisor: &mut A, channel: &C) -> PsResult<usize>
    where
        A: Advisor,
        C: MessageChannel,
    {
        let mut sent = 0;
        while advisor.running_configs().len() < self.batch_size
            && self.dispatched < self.max_trials
        {
            let config = advisor.suggest()?;
            self.dispatched += 1;
            let job = TrialJob::new(config, self.dispatched, self.trial_time_limit);
            debug!(trial = job.trial_number, config = %job.config.id, "dispatching trial");
            channel.send(job)?;
            sent += 1;
        }
        Ok(sent)
    }

    /// Lockstep-mode dispatch: exactly one batch, shrunk to the remaining
    /// budget so the final partial round never over-dispatches. Returns the
    /// number of jobs sent (zero once the budget is spent).
    pub fn dispatch_round<A, C>(&mut self, advisor: &mut A, channel: &C) -> PsResult<usize>
    where
        A: Advisor,
        C: MessageChannel,
    {
        let remaining = self.max_trials.saturating_sub(self.dispatched);
        let count = self.batch_size.min(remaining);
        if count == 0 {
            return Ok(0);
        }

        let configs = advisor.suggest_batch(count)?;
        let sent = configs.len();
        for config in configs {
            self.dispatched += 1;
            let job = TrialJob::new(config, self.dispatched, self.trial_time_limit);
            channel.send(job)?;
        }
        info!(round_size = sent, dispatched = self.dispatched, "batch dispatched");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_advisor::RandomAdvisor;
    use ps_types::{Observation, SearchSpace};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Channel double that remembers sent jobs and never produces results.
    #[derive(Default)]
    struct RecordingChannel {
        jobs: RefCell<VecDeque<TrialJob>>,
    }

    impl MessageChannel for RecordingChannel {
        fn send(&self, job: TrialJob) -> PsResult<()> {
            self.jobs.borrow_mut().push_back(job);
            Ok(())
        }

        fn try_receive(&self) -> Option<Observation> {
            None
        }

        fn receive_timeout(&self, _wait: Duration) -> Option<Observation> {
            None
        }
    }

    fn advisor() -> RandomAdvisor {
        RandomAdvisor::with_seed(SearchSpace::new().add_float("x", 0.0, 1.0), 17)
    }

    #[test]
    fn fill_queue_stops_at_batch_size() {
        let mut advisor = advisor();
        let channel = RecordingChannel::default();
        let mut dispatcher = JobDispatcher::new(3, 100, Duration::from_secs(1));

        let sent = dispatcher.fill_queue(&mut advisor, &channel).unwrap();
        assert_eq!(sent, 3);
        assert_eq!(advisor.running_configs().len(), 3);

        // Nothing resolved, so a second fill admits nothing.
        let sent = dispatcher.fill_queue(&mut advisor, &channel).unwrap();
        assert_eq!(sent, 0);
        assert_eq!(dispatcher.dispatched(), 3);
    }

    #[test]
    fn fill_queue_tops_up_as_trials_resolve() {
        let mut advisor = advisor();
        let channel = RecordingChannel::default();
        let mut dispatcher = JobDispatcher::new(2, 100, Duration::from_secs(1));

        dispatcher.fill_queue(&mut advisor, &channel).unwrap();
        let resolved = channel.jobs.borrow_mut().pop_front().unwrap();
        advisor.observe(&resolved.config, &[0.3]);

        let sent = dispatcher.fill_queue(&mut advisor, &channel).unwrap();
        assert_eq!(sent, 1);
        assert_eq!(dispatcher.dispatched(), 3);
    }

    #[test]
    fn fill_queue_respects_trial_budget() {
        let mut advisor = advisor();
        let channel = RecordingChannel::default();
        let mut dispatcher = JobDispatcher::new(8, 5, Duration::from_secs(1));

        let sent = dispatcher.fill_queue(&mut advisor, &channel).unwrap();
        assert_eq!(sent, 5);
        assert!(dispatcher.budget_exhausted());
    }

    #[test]
    fn rounds_shrink_to_the_exact_remainder() {
        let mut advisor = advisor();
        let channel = RecordingChannel::default();
        let mut dispatcher = JobDispatcher::new(4, 10, Duration::from_secs(1));

        let mut round_sizes = Vec::new();
        loop {
            let sent = dispatcher.dispatch_round(&mut advisor, &channel).unwrap();
            if sent == 0 {
                break;
            }
            round_sizes.push(sent);
            // Resolve the whole round so the running set drains.
            while let Some(job) = channel.jobs.borrow_mut().pop_front() {
                advisor.observe(&job.config, &[0.0]);
            }
        }

        assert_eq!(round_sizes, vec![4, 4, 2]);
        assert_eq!(dispatcher.dispatched(), 10);
    }

    #[test]
    fn trial_numbers_are_sequential() {
        let mut advisor = advisor();
        let channel = RecordingChannel::default();
        let mut dispatcher = JobDispatcher::new(5, 5, Duration::from_secs(1));

        dispatcher.fill_queue(&mut advisor, &channel).unwrap();
        let numbers: Vec<usize> = channel.jobs.borrow().iter().map(|j| j.trial_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }
}
