//! PagePilot - natural-language browser automation core.
//!
//! Pipeline: instruction -> indexed accessibility snapshot -> interpreter
//! proposal -> validation -> durable structural locator -> executor. The
//! observation cache sits between proposal and resolution so repeated
//! instructions against an unchanged page never touch the interpreter again.
//!
//! The heavy lifting lives in the workspace crates (`tree-indexer`,
//! `action-locator`, `interpreter-bridge`, `observation-cache`,
//! `action-executor`, `extraction-schema`); this crate wires them into a
//! `Session` and a CLI.

pub mod config;
pub mod driver;
pub mod session;

pub use config::Settings;
pub use driver::{LoggingDriver, SnapshotDom};
pub use session::{ActRequest, ActionOutcome, Session, SnapshotPort};
