//! Uniform random sampling advisor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

use ps_types::{
    ConfigId, Configuration, ParameterKind, ParameterValue, PsError, PsResult, SearchSpace,
};

use crate::advisor::Advisor;

/// Draw one value per dimension, uniformly within each dimension's range.
pub(crate) fn sample_values<R: Rng>(
    space: &SearchSpace,
    rng: &mut R,
) -> HashMap<String, ParameterValue> {
    let mut values = HashMap::new();

    for param in &space.parameters {
        let value = match &param.kind {
            ParameterKind::FloatRange { low, high } => {
                ParameterValue::Float(rng.gen_range(*low..=*high))
            }
            ParameterKind::IntRange { low, high } => {
                ParameterValue::Int(rng.gen_range(*low..=*high))
            }
            ParameterKind::LogUniform { low, high } => {
                let log_val: f64 = rng.gen_range(low.ln()..=high.ln());
                ParameterValue::Float(log_val.exp())
            }
            ParameterKind::Choice { values } => {
                let idx = rng.gen_range(0..values.len());
                ParameterValue::Json(values[idx].clone())
            }
        };
        values.insert(param.name.clone(), value);
    }

    values
}

/// Independent uniform sampling across the search space.
///
/// Stateless between suggestions apart from the running set, so it never
/// benefits from observations — useful as a baseline and in tests.
#[derive(Debug)]
pub struct RandomAdvisor {
    space: SearchSpace,
    rng: StdRng,
    running: HashSet<ConfigId>,
    init_design: usize,
}

impl RandomAdvisor {
    pub fn new(space: SearchSpace) -> Self {
        Self {
            space,
            rng: StdRng::from_entropy(),
            running: HashSet::new(),
            init_design: 3,
        }
    }

    /// Deterministic sampling for reproducible runs.
    pub fn with_seed(space: SearchSpace, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(space)
        }
    }

    pub fn with_init_design(mut self, count: usize) -> Self {
        self.init_design = count;
        self
    }
}

impl Advisor for RandomAdvisor {
    fn suggest(&mut self) -> PsResult<Configuration> {
        if self.space.is_empty() {
            return Err(PsError::Advisor("search space has no parameters".into()));
        }
        let config = Configuration::new(sample_values(&self.space, &mut self.rng));
        self.running.insert(config.id);
        Ok(config)
    }

    fn running_configs(&self) -> &HashSet<ConfigId> {
        &self.running
    }

    fn observe(&mut self, config: &Configuration, _objectives: &[f64]) {
        self.running.remove(&config.id);
    }

    fn init_design_count(&self) -> usize {
        self.init_design
    }
}
