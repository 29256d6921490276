//! Field-by-field strict validation

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::SchemaError;
use crate::schema::{ExtractionSchema, FieldKind, FieldSpec};

/// Validate an interpreter extraction result against the schema.
///
/// All-or-nothing: the first violation fails the whole extraction. On
/// success the returned value is the input with any opted-in numeric
/// widening applied; nothing else is rewritten.
pub fn validate(schema: &ExtractionSchema, value: &Value) -> Result<Value, SchemaError> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(SchemaError::NotAnObject {
                actual: kind_name(other),
            })
        }
    };

    for key in object.keys() {
        if !schema.fields.contains_key(key) {
            return Err(SchemaError::UnexpectedField { field: key.clone() });
        }
    }

    let mut out = Map::new();
    for (name, spec) in &schema.fields {
        match object.get(name) {
            Some(field_value) => {
                let checked = check_field(name, spec, field_value)?;
                out.insert(name.clone(), checked);
            }
            None if spec.required => {
                return Err(SchemaError::MissingField {
                    field: name.clone(),
                })
            }
            None => {}
        }
    }

    debug!(fields = out.len(), "extraction result validated");
    Ok(Value::Object(out))
}

fn check_field(path: &str, spec: &FieldSpec, value: &Value) -> Result<Value, SchemaError> {
    // Widening is the one permitted coercion, and only for number fields
    // that opt in.
    if spec.widen_numeric_strings && spec.kind == FieldKind::Number {
        if let Value::String(raw) = value {
            return widen_numeric(path, raw);
        }
    }
    check_kind(path, &spec.kind, value)
}

fn check_kind(path: &str, kind: &FieldKind, value: &Value) -> Result<Value, SchemaError> {
    let ok = match (kind, value) {
        (FieldKind::String, Value::String(_)) => true,
        (FieldKind::Number, Value::Number(_)) => true,
        (FieldKind::Boolean, Value::Bool(_)) => true,
        (FieldKind::Object, Value::Object(_)) => true,
        (FieldKind::Array(inner), Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (position, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{position}]");
                out.push(check_kind(&item_path, inner, item)?);
            }
            return Ok(Value::Array(out));
        }
        _ => false,
    };

    if ok {
        Ok(value.clone())
    } else {
        Err(SchemaError::WrongKind {
            field: path.to_string(),
            expected: kind.describe(),
            actual: kind_name(value),
        })
    }
}

fn widen_numeric(path: &str, raw: &str) -> Result<Value, SchemaError> {
    let parsed: f64 = raw
        .trim()
        .parse()
        .map_err(|_| SchemaError::UnparseableNumber {
            field: path.to_string(),
            raw: raw.to_string(),
        })?;
    serde_json::Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| SchemaError::UnparseableNumber {
            field: path.to_string(),
            raw: raw.to_string(),
        })
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
