//! Thread-backed pool of local workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::info;

use ps_scheduler::WorkerEndpoint;

use crate::objective::Objective;
use crate::worker::Worker;

/// Runs N [`Worker`]s on local threads against one shared endpoint.
///
/// Stands in for a fleet of remote evaluation processes: jobs go to
/// whichever worker is free, results funnel back concurrently. The
/// orchestrator does not manage worker lifecycle, so shutdown is the
/// embedder's job — call [`LocalWorkerPool::shutdown`] when the run is
/// over, or in-flight evaluations keep running with nobody draining them.
pub struct LocalWorkerPool {
    shutdown: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl LocalWorkerPool {
    /// Spawn `size` workers over the endpoint.
    pub fn spawn(size: usize, endpoint: WorkerEndpoint, objective: Arc<dyn Objective>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let handles = (0..size)
            .map(|i| {
                let worker = Worker::new(
                    format!("worker-{i}"),
                    endpoint.clone(),
                    objective.clone(),
                );
                let flag = shutdown.clone();
                std::thread::spawn(move || worker.run(&flag))
            })
            .collect();
        info!(size, "local worker pool started");
        Self { shutdown, handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Raise the shutdown flag and join every worker thread. Workers finish
    /// their current evaluation first; queued jobs are left behind.
    pub fn shutdown(self) {
        self.shutdown.store(true, Ordering::Relaxed);
        for handle in self.handles {
            let _ = handle.join();
        }
        info!("local worker pool stopped");
    }
}
