//! Objective-function capability evaluated by workers.

use ps_types::Configuration;

/// What one evaluation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// Evaluation succeeded with one value per objective.
    Completed { objectives: Vec<f64> },
    /// Evaluation failed; the cause travels back as a diagnostic message.
    Failed { message: String },
}

impl EvalOutcome {
    /// Single-objective success.
    pub fn scalar(value: f64) -> Self {
        Self::Completed {
            objectives: vec![value],
        }
    }
}

/// A black-box function workers evaluate once per trial.
///
/// Implementations read parameter values out of the configuration; the
/// scheduler on the other side of the channel never does.
pub trait Objective: Send + Sync {
    fn evaluate(&self, config: &Configuration) -> EvalOutcome;
}

impl<F> Objective for F
where
    F: Fn(&Configuration) -> EvalOutcome + Send + Sync,
{
    fn evaluate(&self, config: &Configuration) -> EvalOutcome {
        self(config)
    }
}
