//! Caller-supplied result shape

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Expected JSON kind of a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "of")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Homogeneous array; every element must match the inner kind.
    Array(Box<FieldKind>),
    /// Any JSON object, treated as opaque.
    Object,
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Array(inner) => format!("array of {}", inner.describe()),
            FieldKind::Object => "object".to_string(),
        }
    }
}

/// Declaration of one schema field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Accept a numeric string where a number is expected and widen it.
    /// Off unless the shape asks for it.
    #[serde(default)]
    pub widen_numeric_strings: bool,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            widen_numeric_strings: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn widening(mut self) -> Self {
        self.widen_numeric_strings = true;
        self
    }
}

/// The full expected shape of one extraction: field name to declaration.
/// Strict in both directions: required fields must be present, and fields
/// the schema does not declare are rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    pub fields: BTreeMap<String, FieldSpec>,
}

impl ExtractionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_round_trips_through_json() {
        let schema = ExtractionSchema::new()
            .field("title", FieldSpec::new(FieldKind::String))
            .field(
                "price",
                FieldSpec::new(FieldKind::Number).widening().optional(),
            )
            .field(
                "tags",
                FieldSpec::new(FieldKind::Array(Box::new(FieldKind::String))),
            );

        let wire = serde_json::to_value(&schema).unwrap();
        assert_eq!(wire["fields"]["title"]["kind"], json!("string"));
        assert_eq!(wire["fields"]["price"]["widenNumericStrings"], json!(true));
        assert_eq!(wire["fields"]["price"]["required"], json!(false));

        let back: ExtractionSchema = serde_json::from_value(wire).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn kinds_describe_themselves() {
        assert_eq!(FieldKind::Number.describe(), "number");
        assert_eq!(
            FieldKind::Array(Box::new(FieldKind::Boolean)).describe(),
            "array of boolean"
        );
    }
}
