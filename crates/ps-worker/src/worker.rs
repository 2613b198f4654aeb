//! The single-worker evaluation loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use ps_scheduler::WorkerEndpoint;
use ps_types::{Observation, TrialJob};

use crate::objective::{EvalOutcome, Objective};

/// One evaluation worker: pulls jobs, evaluates, submits observations.
///
/// The per-trial time limit is enforced here, not by the orchestrator: an
/// evaluation that overruns the limit on its job is reported as a failure.
pub struct Worker {
    id: String,
    endpoint: WorkerEndpoint,
    objective: Arc<dyn Objective>,
    idle_wait: Duration,
}

impl Worker {
    pub fn new(id: impl Into<String>, endpoint: WorkerEndpoint, objective: Arc<dyn Objective>) -> Self {
        Self {
            id: id.into(),
            endpoint,
            objective,
            idle_wait: Duration::from_millis(50),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Pull and evaluate jobs until `shutdown` is raised. Blocks the calling
    /// thread; spawn one thread per worker (see [`crate::LocalWorkerPool`]).
    pub fn run(&self, shutdown: &AtomicBool) {
        info!(worker = %self.id, "worker started");
        while !shutdown.load(Ordering::Relaxed) {
            let Some(job) = self.endpoint.next_job(self.idle_wait) else {
                continue;
            };
            let observation = self.evaluate(job);
            self.endpoint.submit(observation);
        }
        info!(worker = %self.id, "worker stopped");
    }

    /// Evaluate one job and package the outcome.
    fn evaluate(&self, job: TrialJob) -> Observation {
        let TrialJob {
            config,
            trial_number,
            time_limit,
            ..
        } = job;

        debug!(worker = %self.id, trial = trial_number, config = %config.id, "evaluating");
        let clock = Instant::now();
        let outcome = self.objective.evaluate(&config);
        let elapsed = clock.elapsed();

        let observation = match outcome {
            EvalOutcome::Completed { .. } if elapsed > time_limit => {
                warn!(
                    worker = %self.id,
                    trial = trial_number,
                    elapsed = ?elapsed,
                    limit = ?time_limit,
                    "trial exceeded its time limit"
                );
                Observation::failed(config, "trial time limit exceeded")
            }
            EvalOutcome::Completed { objectives } => Observation::completed(config, objectives),
            EvalOutcome::Failed { message } => {
                warn!(worker = %self.id, trial = trial_number, cause = %message, "evaluation failed");
                Observation::failed(config, message)
            }
        };

        observation
            .with_elapsed(elapsed)
            .with_worker(self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_scheduler::{queue_channel, MessageChannel};
    use ps_types::Configuration;
    use std::collections::HashMap;

    fn job_with_limit(limit: Duration) -> TrialJob {
        TrialJob::new(Configuration::new(HashMap::new()), 1, limit)
    }

    #[test]
    fn successful_evaluation_reports_objectives_and_worker() {
        let (_master, endpoint) = queue_channel();
        let worker = Worker::new(
            "w0",
            endpoint,
            Arc::new(|_: &Configuration| EvalOutcome::scalar(2.5)),
        );

        let observation = worker.evaluate(job_with_limit(Duration::from_secs(60)));
        assert_eq!(observation.objectives, Some(vec![2.5]));
        assert_eq!(observation.worker_id.as_deref(), Some("w0"));
        assert!(observation.elapsed.is_some());
    }

    #[test]
    fn overrunning_the_time_limit_fails_the_trial() {
        let (_master, endpoint) = queue_channel();
        let worker = Worker::new(
            "w0",
            endpoint,
            Arc::new(|_: &Configuration| {
                std::thread::sleep(Duration::from_millis(20));
                EvalOutcome::scalar(1.0)
            }),
        );

        let observation = worker.evaluate(job_with_limit(Duration::from_millis(1)));
        assert!(observation.is_failed());
        assert_eq!(
            observation.message.as_deref(),
            Some("trial time limit exceeded")
        );
    }

    #[test]
    fn objective_failure_travels_back_as_message() {
        let (_master, endpoint) = queue_channel();
        let worker = Worker::new(
            "w0",
            endpoint,
            Arc::new(|_: &Configuration| EvalOutcome::Failed {
                message: "diverged".into(),
            }),
        );

        let observation = worker.evaluate(job_with_limit(Duration::from_secs(60)));
        assert!(observation.is_failed());
        assert_eq!(observation.message.as_deref(), Some("diverged"));
    }

    #[test]
    fn loop_drains_jobs_until_shutdown() {
        let (master, endpoint) = queue_channel();
        let worker = Worker::new(
            "w0",
            endpoint,
            Arc::new(|_: &Configuration| EvalOutcome::scalar(0.0)),
        );

        for n in 1..=3 {
            master
                .send(TrialJob::new(
                    Configuration::new(HashMap::new()),
                    n,
                    Duration::from_secs(60),
                ))
                .unwrap();
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();
        let handle = std::thread::spawn(move || worker.run(&flag));

        let mut seen = 0;
        while seen < 3 {
            if master.receive_timeout(Duration::from_millis(200)).is_some() {
                seen += 1;
            }
        }
        shutdown.store(true, Ordering::Relaxed);
        handle.join().unwrap();
        assert_eq!(seen, 3);
    }
}
