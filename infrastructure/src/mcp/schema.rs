//! JSON Schema for tool inputs
//!
//! Every runbook parameter is a string property. Declared defaults are
//! advertised so that clients can show them, and unknown properties are
//! rejected up front.

use rmcp::model::JsonObject;
use runbook_domain::ParameterDescriptor;
use serde_json::{Value, json};

/// Build the `inputSchema` object for a tool with `parameters`
pub fn input_schema(parameters: &[ParameterDescriptor]) -> JsonObject {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in parameters {
        let mut prop = serde_json::Map::new();
        prop.insert("type".to_string(), json!("string"));
        prop.insert("description".to_string(), json!(param.description));
        if let Some(default) = &param.default {
            prop.insert("default".to_string(), json!(default));
        }
        properties.insert(param.name.clone(), Value::Object(prop));

        if param.required {
            required.push(json!(param.name));
        }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema.insert("required".to_string(), Value::Array(required));
    schema.insert("additionalProperties".to_string(), json!(false));
    schema
}
