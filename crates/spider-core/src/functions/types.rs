use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Shape of a single declared parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    /// Closed set of accepted values, when the parameter is an enumeration.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

impl ParameterSpec {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            param_type: "string".to_string(),
            description: description.into(),
            allowed_values: None,
        }
    }

    pub fn string_enum(
        description: impl Into<String>,
        allowed_values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            param_type: "string".to_string(),
            description: description.into(),
            allowed_values: Some(allowed_values.into_iter().map(Into::into).collect()),
        }
    }
}

/// JSON-schema-style parameter object advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParametersSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, ParameterSpec>,
    pub required: Vec<String>,
}

impl ParametersSchema {
    pub fn object(properties: BTreeMap<String, ParameterSpec>, required: Vec<String>) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties,
            required,
        }
    }
}

/// Schema exported for one registered capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: ParametersSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_serializes_to_wire_shape() {
        let mut properties = BTreeMap::new();
        properties.insert(
            "unit".to_string(),
            ParameterSpec::string_enum("Temperature unit", ["celsius", "fahrenheit"]),
        );

        let schema = FunctionSchema {
            name: "get_weather".to_string(),
            description: "Get the current weather".to_string(),
            parameters: ParametersSchema::object(properties, vec!["unit".to_string()]),
        };

        let value = serde_json::to_value(&schema).expect("serialize");

        assert_eq!(value["name"], "get_weather");
        assert_eq!(value["parameters"]["type"], "object");
        assert_eq!(value["parameters"]["properties"]["unit"]["type"], "string");
        assert_eq!(
            value["parameters"]["properties"]["unit"]["enum"][0],
            "celsius"
        );
        assert_eq!(value["parameters"]["required"][0], "unit");
    }
}
