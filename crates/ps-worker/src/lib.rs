//! Worker-side runtime for ParaSweep.
//!
//! Workers live outside the scheduling core: they pull jobs from the
//! channel, evaluate the objective, enforce the per-trial time limit, and
//! push observations back. This crate provides the [`Objective`] capability
//! trait, the single-worker loop, and a thread-backed [`LocalWorkerPool`]
//! for integration tests and local runs.

pub mod objective;
pub mod pool;
pub mod worker;

pub use objective::{EvalOutcome, Objective};
pub use pool::LocalWorkerPool;
pub use worker::Worker;
