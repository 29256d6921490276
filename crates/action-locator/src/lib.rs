//! Locator Resolver - tree identifiers to durable structural paths
//!
//! Converts a snapshot `NodeId` into a `{tag, sibling-index}` path from the
//! document root. The path is independent of class names and ids, so
//! cosmetic styling changes do not break resolution; sibling reordering does
//! (acknowledged fragility). Re-resolution walks the path against the live
//! document and reports staleness instead of silently matching an unrelated
//! element.

pub mod errors;
pub mod ports;
pub mod resolver;
pub mod types;

pub use errors::LocatorError;
pub use ports::DomPort;
pub use resolver::{re_resolve, resolve};
pub use types::{ElementHandle, PathStep, ResolvedLocator};
