//! Action Executor - drive one validated action to a terminal state
//!
//! A small state machine per action: `Pending -> Resolving -> Ready ->
//! Executing -> {Succeeded, Failed}`. Resolution failures get exactly one
//! bounded retry (elements that have not painted yet); execution is never
//! retried, because side-effecting primitives are not safely retriable
//! without caller knowledge of partial effects.

pub mod errors;
pub mod keys;
pub mod model;
pub mod policy;
pub mod ports;
pub mod runner;
pub mod tempo;
pub mod wait;

pub use errors::ExecError;
pub use model::{ActionReport, ActionState, ExecCtx, FailCause};
pub use policy::ExecutorPolicy;
pub use ports::{Actionability, DriverPort, OptionEntry, TargetPort};
pub use runner::{execute, RuntimeDeps};
