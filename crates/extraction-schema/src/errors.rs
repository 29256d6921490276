//! Validation failure shapes

use pagepilot_core_types::AutomationError;
use thiserror::Error;

/// A single schema violation. The first violation fails the extraction;
/// `field` is the offending path ("price", "items[2]").
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("extraction result is not a JSON object (got {actual})")]
    NotAnObject { actual: &'static str },

    #[error("required field '{field}' is absent")]
    MissingField { field: String },

    #[error("field '{field}' expected {expected}, got {actual}")]
    WrongKind {
        field: String,
        expected: String,
        actual: &'static str,
    },

    #[error("field '{field}' is not declared by the schema")]
    UnexpectedField { field: String },

    #[error("field '{field}' is not a parseable number: '{raw}'")]
    UnparseableNumber { field: String, raw: String },
}

impl SchemaError {
    fn field(&self) -> String {
        match self {
            SchemaError::NotAnObject { .. } => "$".to_string(),
            SchemaError::MissingField { field }
            | SchemaError::WrongKind { field, .. }
            | SchemaError::UnexpectedField { field }
            | SchemaError::UnparseableNumber { field, .. } => field.clone(),
        }
    }
}

impl From<SchemaError> for AutomationError {
    fn from(err: SchemaError) -> Self {
        AutomationError::SchemaMismatch {
            field: err.field(),
            reason: err.to_string(),
        }
    }
}
