//! The ask/tell capability interface consumed by the scheduler.

use std::collections::HashSet;

use ps_types::{ConfigId, Configuration, PsResult};

/// Suggestion source for an optimization run.
///
/// This is a capability interface, not a base optimizer: anything that can
/// produce configurations and absorb performances satisfies it — uniform
/// random sampling, a surrogate model, or a replay of a recorded run.
///
/// The advisor owns the running set. [`Advisor::suggest`] registers the new
/// configuration before returning it, and [`Advisor::observe`] removes it;
/// the dispatcher reads the set's size to bound outstanding work, so an
/// implementation that forgets either side breaks admission control.
pub trait Advisor: Send {
    /// Ask for one new configuration. The returned configuration is in the
    /// running set until a matching [`Advisor::observe`] call resolves it.
    fn suggest(&mut self) -> PsResult<Configuration>;

    /// Ask for `count` configurations at once (lockstep batch mode).
    fn suggest_batch(&mut self, count: usize) -> PsResult<Vec<Configuration>> {
        (0..count).map(|_| self.suggest()).collect()
    }

    /// Configurations with outstanding, unresolved jobs.
    fn running_configs(&self) -> &HashSet<ConfigId>;

    /// Tell: feed back the performance of a resolved trial.
    ///
    /// Removes the configuration from the running set. The scheduler calls
    /// this exactly once per resolved trial.
    fn observe(&mut self, config: &Configuration, objectives: &[f64]);

    /// Number of trials in the advisor's initial design phase.
    fn init_design_count(&self) -> usize;
}
