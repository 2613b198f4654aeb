//! Trial descriptors and the run history log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::space::ParameterValue;

/// Unique identity of a suggested configuration.
pub type ConfigId = Uuid;

/// A candidate point in the search space.
///
/// The scheduler treats this as an opaque payload: identity is the `id`, so
/// the same value map suggested twice yields two independent trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: ConfigId,
    pub values: HashMap<String, ParameterValue>,
}

impl Configuration {
    pub fn new(values: HashMap<String, ParameterValue>) -> Self {
        Self {
            id: Uuid::new_v4(),
            values,
        }
    }

    /// Look up a single parameter value by name.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }
}

/// A dispatched request to evaluate one configuration under a time limit.
///
/// Created by the dispatcher, consumed by a worker, never mutated after
/// creation. The time limit is enforced by the worker, not the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialJob {
    pub config: Configuration,
    /// 1-indexed dispatch sequence number.
    pub trial_number: usize,
    pub time_limit: Duration,
    pub created_at: DateTime<Utc>,
}

impl TrialJob {
    pub fn new(config: Configuration, trial_number: usize, time_limit: Duration) -> Self {
        Self {
            config,
            trial_number,
            time_limit,
            created_at: Utc::now(),
        }
    }
}

/// The resolved outcome of a job, produced by a worker.
///
/// `objectives == None` means the evaluation failed. The collector
/// substitutes a sentinel worst-case performance before the advisor sees the
/// failure, so `message` is the only place the cause survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub config: Configuration,
    pub objectives: Option<Vec<f64>>,
    /// Wall-clock time the evaluation took, as measured by the worker.
    pub elapsed: Option<Duration>,
    pub worker_id: Option<String>,
    pub message: Option<String>,
}

impl Observation {
    pub fn completed(config: Configuration, objectives: Vec<f64>) -> Self {
        Self {
            config,
            objectives: Some(objectives),
            elapsed: None,
            worker_id: None,
            message: None,
        }
    }

    pub fn failed(config: Configuration, message: impl Into<String>) -> Self {
        Self {
            config,
            objectives: None,
            elapsed: None,
            worker_id: None,
            message: Some(message.into()),
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    pub fn with_worker(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = Some(worker_id.into());
        self
    }

    /// Whether the evaluation reported no performance.
    pub fn is_failed(&self) -> bool {
        self.objectives.is_none()
    }
}

/// Ordered record of all resolved trials.
///
/// Three parallel sequences — configurations, performance vectors, elapsed
/// times since run start — with one entry appended per resolved trial, in
/// completion order (not dispatch order). Append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    configurations: Vec<Configuration>,
    performances: Vec<Vec<f64>>,
    elapsed: Vec<Duration>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one resolved trial.
    pub fn record(&mut self, config: Configuration, performance: Vec<f64>, elapsed: Duration) {
        self.configurations.push(config);
        self.performances.push(performance);
        self.elapsed.push(elapsed);
    }

    /// Number of resolved trials.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn performances(&self) -> &[Vec<f64>] {
        &self.performances
    }

    pub fn elapsed(&self) -> &[Duration] {
        &self.elapsed
    }

    /// Iterate resolved trials in completion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Configuration, &[f64], Duration)> + '_ {
        self.configurations
            .iter()
            .zip(self.performances.iter())
            .zip(self.elapsed.iter())
            .map(|((c, p), e)| (c, p.as_slice(), *e))
    }

    /// Best entry so far, ranked by first objective (minimization).
    pub fn best(&self) -> Option<(&Configuration, f64)> {
        self.configurations
            .iter()
            .zip(self.performances.iter())
            .filter_map(|(c, p)| p.first().map(|v| (c, *v)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}
