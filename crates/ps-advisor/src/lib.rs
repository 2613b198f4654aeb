//! Suggestion advisors for ParaSweep.
//!
//! Provides:
//! - The [`Advisor`] ask/tell capability trait consumed by the scheduler
//! - Running-set bookkeeping (the scheduler's admission-control signal)
//! - [`RandomAdvisor`]: uniform sampling over the search space
//! - [`SurrogateAdvisor`]: initial design followed by an explore/exploit mix

pub mod advisor;
pub mod random;
pub mod surrogate;

pub use advisor::Advisor;
pub use random::RandomAdvisor;
pub use surrogate::SurrogateAdvisor;
