//! Surrogate-biased sampling advisor.
//!
//! Tracks observed (values, objective) pairs and biases future suggestions
//! toward the best-known region. The default is a weighted-random
//! perturbation heuristic; a full surrogate model (GP, TPE) plugs in behind
//! the same [`Advisor`] trait without touching the scheduler.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

use ps_types::{
    ConfigId, Configuration, ParameterKind, ParameterValue, PsError, PsResult, SearchSpace,
};

use crate::advisor::Advisor;
use crate::random::sample_values;

/// Advisor with an initial design phase followed by an explore/exploit mix.
///
/// The first `init_design` suggestions are uniform samples regardless of the
/// exploration weight; after that, each suggestion explores with probability
/// `exploration_weight` and otherwise perturbs the best observed point.
/// Minimization convention: lower first objective is better.
#[derive(Debug)]
pub struct SurrogateAdvisor {
    space: SearchSpace,
    rng: StdRng,
    running: HashSet<ConfigId>,
    observations: Vec<(HashMap<String, ParameterValue>, f64)>,
    exploration_weight: f64,
    init_design: usize,
}

impl SurrogateAdvisor {
    pub fn new(space: SearchSpace) -> Self {
        Self {
            space,
            rng: StdRng::from_entropy(),
            running: HashSet::new(),
            observations: Vec::new(),
            exploration_weight: 0.3,
            init_design: 3,
        }
    }

    pub fn with_seed(space: SearchSpace, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(space)
        }
    }

    pub fn with_exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = weight;
        self
    }

    pub fn with_init_design(mut self, count: usize) -> Self {
        self.init_design = count;
        self
    }

    /// Number of completed observations absorbed so far.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Exploitation: perturb the best-known point within each dimension.
    fn perturb_best(&mut self) -> HashMap<String, ParameterValue> {
        let best = self
            .observations
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let base = match best {
            Some((values, _)) => values.clone(),
            None => return sample_values(&self.space, &mut self.rng),
        };

        let mut perturbed = HashMap::new();
        for param in &self.space.parameters {
            let base_val = base.get(&param.name);
            let value = match (&param.kind, base_val) {
                (ParameterKind::FloatRange { low, high }, Some(ParameterValue::Float(v))) => {
                    let noise = self.rng.gen_range(-0.1..0.1) * (high - low);
                    ParameterValue::Float((v + noise).clamp(*low, *high))
                }
                (ParameterKind::IntRange { low, high }, Some(ParameterValue::Int(v))) => {
                    let delta: i64 = self.rng.gen_range(-2..=2);
                    ParameterValue::Int((v + delta).clamp(*low, *high))
                }
                (ParameterKind::LogUniform { low, high }, Some(ParameterValue::Float(v))) => {
                    let log_range = high.ln() - low.ln();
                    let noise = self.rng.gen_range(-0.1..0.1) * log_range;
                    ParameterValue::Float((v.ln() + noise).exp().clamp(*low, *high))
                }
                // Choices and missing dimensions fall back to a fresh draw.
                _ => {
                    let single = SearchSpace {
                        parameters: vec![param.clone()],
                    };
                    sample_values(&single, &mut self.rng)
                        .remove(&param.name)
                        .unwrap_or(ParameterValue::Int(0))
                }
            };
            perturbed.insert(param.name.clone(), value);
        }

        perturbed
    }
}

impl Advisor for SurrogateAdvisor {
    fn suggest(&mut self) -> PsResult<Configuration> {
        if self.space.is_empty() {
            return Err(PsError::Advisor("search space has no parameters".into()));
        }

        let in_init_design = self.observations.len() < self.init_design;
        let values = if in_init_design || self.rng.gen::<f64>() < self.exploration_weight {
            sample_values(&self.space, &mut self.rng)
        } else {
            self.perturb_best()
        };

        let config = Configuration::new(values);
        self.running.insert(config.id);
        Ok(config)
    }

    fn running_configs(&self) -> &HashSet<ConfigId> {
        &self.running
    }

    fn observe(&mut self, config: &Configuration, objectives: &[f64]) {
        self.running.remove(&config.id);
        if let Some(first) = objectives.first() {
            self.observations.push((config.values.clone(), *first));
        }
    }

    fn init_design_count(&self) -> usize {
        self.init_design
    }
}
