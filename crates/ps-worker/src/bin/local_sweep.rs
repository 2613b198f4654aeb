//! End-to-end local sweep: a surrogate advisor driving a pool of worker
//! threads over the in-process queue channel.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ps_advisor::SurrogateAdvisor;
use ps_scheduler::{queue_channel, ExecutionStrategy, RunConfig, RunController};
use ps_types::{Configuration, ParameterValue, SearchSpace};
use ps_worker::{EvalOutcome, LocalWorkerPool};

/// Classic two-dimensional benchmark; global minimum ~0.3979.
fn branin(config: &Configuration) -> EvalOutcome {
    let (Some(ParameterValue::Float(x1)), Some(ParameterValue::Float(x2))) =
        (config.get("x1"), config.get("x2"))
    else {
        return EvalOutcome::Failed {
            message: "missing x1/x2".into(),
        };
    };

    let pi = std::f64::consts::PI;
    let y = (x2 - 5.1 / (4.0 * pi * pi) * x1 * x1 + 5.0 / pi * x1 - 6.0).powi(2)
        + 10.0 * (1.0 - 1.0 / (8.0 * pi)) * x1.cos()
        + 10.0;
    EvalOutcome::scalar(y)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let space = SearchSpace::new()
        .add_float("x1", -5.0, 10.0)
        .add_float("x2", 0.0, 15.0);

    let (master, endpoint) = queue_channel();
    let pool = LocalWorkerPool::spawn(4, endpoint, Arc::new(branin));

    let advisor = SurrogateAdvisor::new(space).with_init_design(8);
    let config = RunConfig::new(60, 4)
        .with_max_runtime(Duration::from_secs(60))
        .with_poll_interval(Duration::from_millis(10))
        .with_strategy(ExecutionStrategy::Asynchronous);

    let history = RunController::new(advisor, master, config)?.run()?;
    pool.shutdown();

    let (best_config, best_perf) = history
        .best()
        .ok_or_else(|| anyhow::anyhow!("run produced no resolved trials"))?;
    info!(trials = history.len(), best = best_perf, "sweep finished");
    println!(
        "best objective {best_perf:.4} at x1={} x2={}",
        best_config
            .get("x1")
            .map(ToString::to_string)
            .unwrap_or_default(),
        best_config
            .get("x2")
            .map(ToString::to_string)
            .unwrap_or_default()
    );
    Ok(())
}
