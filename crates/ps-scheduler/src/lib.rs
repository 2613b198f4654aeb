//! Trial-scheduling core for ParaSweep.
//!
//! Coordinates a pool of evaluation workers for an iterative optimization
//! loop. One single-threaded orchestrator pulls candidate configurations
//! from an advisor, dispatches them as jobs over a message channel, and
//! drains completed observations back — in either batch-lockstep
//! (synchronous) or streaming (asynchronous) mode, under a trial budget and
//! a wall-clock deadline.
//!
//! Provides:
//! - [`MessageChannel`] contract and the crossbeam-backed [`QueueChannel`]
//! - [`JobDispatcher`]: admission-controlled job creation
//! - [`ResultCollector`]: observation draining and failure normalization
//! - [`RunController`]: the top-level run state machine

pub mod channel;
pub mod collector;
pub mod config;
pub mod controller;
pub mod dispatcher;

pub use channel::{queue_channel, MessageChannel, QueueChannel, WorkerEndpoint};
pub use collector::ResultCollector;
pub use config::{ExecutionStrategy, RunConfig};
pub use controller::{RunController, RunState};
pub use dispatcher::JobDispatcher;
