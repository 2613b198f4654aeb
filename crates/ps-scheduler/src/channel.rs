//! Message channel between the orchestrator and evaluation workers.
//!
//! All cross-thread synchronization lives inside the channel; the scheduler
//! logic above it never sees a lock.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use ps_types::{Observation, PsError, PsResult, TrialJob};

/// Bidirectional transport contract between one orchestrator and N workers.
///
/// `send` is fire-and-forget: it enqueues a job and returns immediately,
/// with no delivery acknowledgement. `try_receive` never blocks — `None`
/// means "no result yet", not an error. `receive_timeout` is the
/// orchestrator's single suspension point: it parks for at most `wait` for
/// one observation, replacing a sleep-and-repoll cycle with a genuine
/// blocking receive while keeping the same observable ordering.
pub trait MessageChannel {
    fn send(&self, job: TrialJob) -> PsResult<()>;

    fn try_receive(&self) -> Option<Observation>;

    fn receive_timeout(&self, wait: Duration) -> Option<Observation>;
}

/// Orchestrator endpoint of the in-process queue channel.
#[derive(Debug)]
pub struct QueueChannel {
    job_tx: Sender<TrialJob>,
    result_rx: Receiver<Observation>,
}

/// Worker endpoint of the in-process queue channel.
///
/// Cloneable: every worker holds its own copy. Jobs go to whichever worker
/// receives first; results from all workers funnel back to the single
/// orchestrator endpoint.
#[derive(Debug, Clone)]
pub struct WorkerEndpoint {
    job_rx: Receiver<TrialJob>,
    result_tx: Sender<Observation>,
}

/// Create a connected (orchestrator, worker) endpoint pair.
pub fn queue_channel() -> (QueueChannel, WorkerEndpoint) {
    let (job_tx, job_rx) = unbounded();
    let (result_tx, result_rx) = unbounded();
    (
        QueueChannel { job_tx, result_rx },
        WorkerEndpoint { job_rx, result_tx },
    )
}

impl MessageChannel for QueueChannel {
    fn send(&self, job: TrialJob) -> PsResult<()> {
        self.job_tx
            .send(job)
            .map_err(|_| PsError::Channel("all worker endpoints disconnected".into()))
    }

    fn try_receive(&self) -> Option<Observation> {
        self.result_rx.try_recv().ok()
    }

    fn receive_timeout(&self, wait: Duration) -> Option<Observation> {
        match self.result_rx.recv_timeout(wait) {
            Ok(observation) => Some(observation),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl WorkerEndpoint {
    /// Wait up to `wait` for the next job. `None` on idle timeout or when
    /// the orchestrator has hung up.
    pub fn next_job(&self, wait: Duration) -> Option<TrialJob> {
        self.job_rx.recv_timeout(wait).ok()
    }

    /// Push a completed observation back to the orchestrator. Best-effort:
    /// a result submitted after the orchestrator is gone is dropped.
    pub fn submit(&self, observation: Observation) {
        let _ = self.result_tx.send(observation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_types::Configuration;
    use std::collections::HashMap;
    use std::thread;

    fn job(n: usize) -> TrialJob {
        TrialJob::new(
            Configuration::new(HashMap::new()),
            n,
            Duration::from_secs(60),
        )
    }

    #[test]
    fn try_receive_is_nonblocking_when_empty() {
        let (master, _worker) = queue_channel();
        assert!(master.try_receive().is_none());
    }

    #[test]
    fn jobs_and_results_round_through() {
        let (master, worker) = queue_channel();
        master.send(job(1)).unwrap();

        let received = worker.next_job(Duration::from_millis(100)).unwrap();
        assert_eq!(received.trial_number, 1);

        worker.submit(Observation::completed(received.config, vec![0.5]));
        let observation = master.try_receive().unwrap();
        assert_eq!(observation.objectives, Some(vec![0.5]));
    }

    #[test]
    fn receive_timeout_gives_up_after_wait() {
        let (master, _worker) = queue_channel();
        let clock = std::time::Instant::now();
        assert!(master.receive_timeout(Duration::from_millis(20)).is_none());
        assert!(clock.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn multiple_workers_share_the_job_queue() {
        let (master, worker) = queue_channel();
        for n in 1..=4 {
            master.send(job(n)).unwrap();
        }

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let endpoint = worker.clone();
                thread::spawn(move || {
                    let mut taken = 0;
                    while let Some(job) = endpoint.next_job(Duration::from_millis(50)) {
                        endpoint.submit(Observation::completed(job.config, vec![0.0]));
                        taken += 1;
                    }
                    taken
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 4);

        let mut results = 0;
        while master.try_receive().is_some() {
            results += 1;
        }
        assert_eq!(results, 4);
    }

    #[test]
    fn send_fails_once_workers_hang_up() {
        let (master, worker) = queue_channel();
        drop(worker);
        assert!(master.send(job(1)).is_err());
    }
}
