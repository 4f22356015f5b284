//! Structural schema for manifests
//!
//! A small subset of JSON Schema, enough to describe the manifest format:
//! `type`, `properties`, `required`, `items`, `minItems`, `enum`, `anyOf`,
//! `additionalProperties`, `patternProperties`, `minimum` and `maximum`.
//! Annotations (`$schema`, `title`, `description`, ...) are accepted and
//! ignored. Any other keyword makes the schema invalid, so a document never
//! validates against rules that are not enforced.
//!
//! Validation stops at the first violation and reports it with a JSON
//! pointer to the offending value.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result, ValidationError};

/// Keywords that carry no assertion.
const ANNOTATIONS: &[&str] = &[
    "$schema",
    "$id",
    "$comment",
    "title",
    "description",
    "default",
    "examples",
    "deprecated",
    "readOnly",
    "writeOnly",
];

const MANIFEST_SCHEMA: &str = include_str!("../schema/manifest.schema.json");

static MANIFEST: LazyLock<Schema> = LazyLock::new(|| {
    Schema::parse(MANIFEST_SCHEMA).expect("bundled manifest schema must be valid")
});

/// JSON value types a schema can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl JsonType {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value
                .as_f64()
                .is_some_and(|n| value.is_i64() || value.is_u64() || n.fract() == 0.0),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Null => value.is_null(),
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
        };
        write!(f, "{name}")
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TypeSet {
    One(JsonType),
    Many(Vec<JsonType>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawAdditional {
    Allowed(bool),
    Schema(Box<Schema>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default, rename = "type")]
    types: Option<TypeSet>,
    #[serde(default)]
    properties: BTreeMap<String, Schema>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    items: Option<Box<Schema>>,
    #[serde(default)]
    min_items: Option<usize>,
    #[serde(default, rename = "enum")]
    enumeration: Option<Vec<Value>>,
    #[serde(default)]
    any_of: Option<Vec<Schema>>,
    #[serde(default)]
    additional_properties: Option<RawAdditional>,
    #[serde(default)]
    pattern_properties: BTreeMap<String, Schema>,
    #[serde(default)]
    minimum: Option<f64>,
    #[serde(default)]
    maximum: Option<f64>,
    #[serde(flatten)]
    other: BTreeMap<String, Value>,
}

/// What to do with object keys not covered by `properties` or
/// `patternProperties`.
#[derive(Debug, Clone)]
enum Additional {
    Allowed,
    Forbidden,
    Schema(Box<Schema>),
}

/// A parsed schema document with its patterns compiled.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct Schema {
    types: Vec<JsonType>,
    properties: BTreeMap<String, Schema>,
    required: Vec<String>,
    items: Option<Box<Schema>>,
    min_items: Option<usize>,
    enumeration: Option<Vec<Value>>,
    any_of: Vec<Schema>,
    additional: Additional,
    pattern_properties: Vec<(Regex, Schema)>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl TryFrom<RawSchema> for Schema {
    type Error = String;

    fn try_from(raw: RawSchema) -> std::result::Result<Self, Self::Error> {
        if let Some(keyword) = raw.other.keys().find(|key| !ANNOTATIONS.contains(&key.as_str())) {
            return Err(format!("unsupported schema keyword `{keyword}`"));
        }

        let pattern_properties = raw
            .pattern_properties
            .into_iter()
            .map(|(pattern, schema)| {
                Regex::new(&pattern)
                    .map(|regex| (regex, schema))
                    .map_err(|e| format!("invalid patternProperties key `{pattern}`: {e}"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let types = match raw.types {
            None => Vec::new(),
            Some(TypeSet::One(ty)) => vec![ty],
            Some(TypeSet::Many(types)) => types,
        };

        let additional = match raw.additional_properties {
            None | Some(RawAdditional::Allowed(true)) => Additional::Allowed,
            Some(RawAdditional::Allowed(false)) => Additional::Forbidden,
            Some(RawAdditional::Schema(schema)) => Additional::Schema(schema),
        };

        Ok(Self {
            types,
            properties: raw.properties,
            required: raw.required,
            items: raw.items,
            min_items: raw.min_items,
            enumeration: raw.enumeration,
            any_of: raw.any_of.unwrap_or_default(),
            additional,
            pattern_properties,
            minimum: raw.minimum,
            maximum: raw.maximum,
        })
    }
}

impl Schema {
    /// Parse a schema document from JSON text.
    pub fn parse(document: &str) -> Result<Self> {
        serde_json::from_str(document).map_err(|e| Error::InvalidSchema {
            message: e.to_string(),
        })
    }

    /// Parse a schema document from a JSON value.
    pub fn from_value(document: Value) -> Result<Self> {
        serde_json::from_value(document).map_err(|e| Error::InvalidSchema {
            message: e.to_string(),
        })
    }

    /// The bundled manifest schema.
    pub fn manifest() -> &'static Schema {
        &MANIFEST
    }

    /// Check `value` against this schema, stopping at the first violation.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), ValidationError> {
        self.check(value, "")
    }

    fn check(&self, value: &Value, pointer: &str) -> std::result::Result<(), ValidationError> {
        let fail = |message: String| ValidationError::Structural {
            pointer: if pointer.is_empty() { "/".to_string() } else { pointer.to_string() },
            message,
        };

        if !self.types.is_empty() && !self.types.iter().any(|ty| ty.matches(value)) {
            let expected = self
                .types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(fail(format!("expected {expected}, received {}", describe(value))));
        }

        if let Some(allowed) = &self.enumeration {
            if !allowed.contains(value) {
                let allowed = serde_json::to_string(allowed).unwrap_or_default();
                return Err(fail(format!("expected one of {allowed}, received {value}")));
            }
        }

        if !self.any_of.is_empty()
            && !self.any_of.iter().any(|schema| schema.check(value, pointer).is_ok())
        {
            return Err(fail(format!(
                "{} does not match any allowed shape",
                describe(value)
            )));
        }

        if let Some(number) = value.as_f64() {
            if let Some(minimum) = self.minimum.filter(|min| number < *min) {
                return Err(fail(format!("expected at least {minimum}, received {number}")));
            }
            if let Some(maximum) = self.maximum.filter(|max| number > *max) {
                return Err(fail(format!("expected at most {maximum}, received {number}")));
            }
        }

        match value {
            Value::Object(map) => {
                for key in &self.required {
                    if !map.contains_key(key) {
                        return Err(fail(format!("missing required property `{key}`")));
                    }
                }

                for (key, child) in map {
                    let child_pointer = format!("{pointer}/{}", escape_pointer(key));

                    if let Some(schema) = self.properties.get(key) {
                        schema.check(child, &child_pointer)?;
                        continue;
                    }

                    let mut matched = false;
                    for (pattern, schema) in &self.pattern_properties {
                        if pattern.is_match(key) {
                            matched = true;
                            schema.check(child, &child_pointer)?;
                        }
                    }
                    if matched {
                        continue;
                    }

                    match &self.additional {
                        Additional::Allowed => {}
                        Additional::Forbidden => {
                            return Err(fail(format!("unknown property `{key}`")));
                        }
                        Additional::Schema(schema) => schema.check(child, &child_pointer)?,
                    }
                }
            }
            Value::Array(items) => {
                if let Some(min_items) = self.min_items.filter(|min| items.len() < *min) {
                    return Err(fail(format!(
                        "expected at least {min_items} item(s), received {}",
                        items.len()
                    )));
                }
                if let Some(schema) = &self.items {
                    for (index, item) in items.iter().enumerate() {
                        schema.check(item, &format!("{pointer}/{index}"))?;
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Escape a key for use in a JSON pointer (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
