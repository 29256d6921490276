//! Action Interpreter Adapter - untrusted wire data in, validated actions out
//!
//! The language-understanding collaborator is modeled as a pure
//! request/response boundary (`InterpreterPort`). Whatever comes back is
//! treated as untrusted wire data: it only becomes a typed `ActionProposal`
//! after local validation against the closed method enumeration and the
//! per-method arity table. Contract violations surface as `InvalidProposal`
//! with the offending payload attached and are never retried.

pub mod errors;
pub mod http;
pub mod mock;
pub mod model;
pub mod ports;
pub mod validate;

pub use errors::BridgeError;
pub use http::HttpInterpreter;
pub use mock::MockInterpreter;
pub use model::{ActionMethod, ActionProposal, ExtractRequest, ProposeRequest};
pub use ports::InterpreterPort;
pub use validate::{validate_proposal, validate_proposals};
