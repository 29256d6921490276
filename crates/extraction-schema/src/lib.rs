//! Extraction result validation
//!
//! Interpreter output for `extract` is untrusted wire data. The caller
//! supplies an [`ExtractionSchema`]; [`validate`] checks the returned value
//! against it field by field and fails the whole extraction on the first
//! violation. No partial results, no silent coercion beyond the numeric
//! widening a field explicitly opts into.

pub mod errors;
pub mod schema;
pub mod validate;

pub use errors::SchemaError;
pub use schema::{ExtractionSchema, FieldKind, FieldSpec};
pub use validate::validate;
