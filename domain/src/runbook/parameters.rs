//! Parameter schema and binding
//!
//! A tool's parameters are declared as a YAML mapping. The declaration order
//! is kept so that the published schema lists parameters the way the runbook
//! author wrote them.
//!
//! The invocation contract is plain data: [`ParameterSchema::descriptors`]
//! yields one [`ParameterDescriptor`] per parameter and
//! [`ParameterSchema::bind`] validates a caller-supplied map against it.
//! There is no per-tool code.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Caller-supplied or bound parameter values. Values are always text.
pub type ParameterValues = HashMap<String, String>;

/// A single declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub description: String,
    /// Type tag from the runbook; informational only
    pub param_type: String,
    pub required: bool,
    pub default: Option<String>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: default_param_type(),
            required: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether a caller must supply this parameter
    pub fn must_be_supplied(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// Invocation-contract view of a parameter, handed to the RPC layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Reasons a caller-supplied parameter map is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("unknown parameter(s): {}", .0.join(", "))]
    UnknownParameters(Vec<String>),

    #[error("missing required parameter(s): {}", .0.join(", "))]
    MissingParameters(Vec<String>),
}

/// Ordered set of parameter definitions for one tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    parameters: Vec<ParameterDefinition>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing an earlier one with the same name
    pub fn with(mut self, parameter: ParameterDefinition) -> Self {
        self.insert(parameter);
        self
    }

    fn insert(&mut self, parameter: ParameterDefinition) {
        match self.parameters.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.parameters.iter()
    }

    pub fn descriptors(&self) -> Vec<ParameterDescriptor> {
        self.parameters
            .iter()
            .map(|p| ParameterDescriptor {
                name: p.name.clone(),
                description: p.description.clone(),
                required: p.must_be_supplied(),
                default: p.default.clone(),
            })
            .collect()
    }

    /// Validate `supplied` against the schema and fill in defaults.
    ///
    /// Unknown names are rejected before missing ones are checked. Optional
    /// parameters without a default that the caller omitted stay unbound.
    pub fn bind(&self, mut supplied: ParameterValues) -> Result<ParameterValues, BindingError> {
        let unknown: BTreeSet<&str> = supplied
            .keys()
            .map(String::as_str)
            .filter(|name| self.get(name).is_none())
            .collect();
        if !unknown.is_empty() {
            return Err(BindingError::UnknownParameters(
                unknown.into_iter().map(str::to_string).collect(),
            ));
        }

        let mut missing = Vec::new();
        for param in &self.parameters {
            if supplied.contains_key(&param.name) {
                continue;
            }
            match &param.default {
                Some(default) => {
                    supplied.insert(param.name.clone(), default.clone());
                }
                None if param.required => missing.push(param.name.clone()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(BindingError::MissingParameters(missing));
        }

        Ok(supplied)
    }
}

fn default_param_type() -> String {
    "string".to_string()
}

/// YAML shape of a parameter (the name is the mapping key)
#[derive(Deserialize, Serialize)]
struct RawParameter {
    description: String,
    #[serde(rename = "type", default = "default_param_type")]
    param_type: String,
    #[serde(default)]
    required: bool,
    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    default: Option<String>,
}

/// Accept `default: 8080` or `default: true` as well as strings
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

impl<'de> Deserialize<'de> for ParameterSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = ParameterSchema;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of parameter name to parameter definition")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(ParameterSchema::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(ParameterSchema::default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut schema = ParameterSchema::default();
                while let Some((name, raw)) = map.next_entry::<String, RawParameter>()? {
                    schema.insert(ParameterDefinition {
                        name,
                        description: raw.description,
                        param_type: raw.param_type,
                        required: raw.required,
                        default: raw.default,
                    });
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_any(SchemaVisitor)
    }
}

impl Serialize for ParameterSchema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.parameters.len()))?;
        for p in &self.parameters {
            let raw = RawParameter {
                description: p.description.clone(),
                param_type: p.param_type.clone(),
                required: p.required,
                default: p.default.clone(),
            };
            map.serialize_entry(&p.name, &raw)?;
        }
        map.end()
    }
}
