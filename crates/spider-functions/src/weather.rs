//! Demo weather capability.
//!
//! Returns canned data; exists to exercise schema export, enum-constrained
//! parameters and the dispatch path without an external service.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use spider_core::{Function, FunctionContext, ParameterSpec};

pub struct GetWeather;

#[async_trait]
impl Function for GetWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather in a given location"
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "location".to_string(),
            ParameterSpec::string("The city and state, e.g. San Francisco, CA"),
        );
        parameters.insert(
            "unit".to_string(),
            ParameterSpec::string_enum("The temperature unit to use", ["celsius", "fahrenheit"]),
        );
        parameters
    }

    fn required(&self) -> Vec<String> {
        vec!["location".to_string()]
    }

    async fn call(
        &self,
        _context: &FunctionContext,
        args: &Map<String, Value>,
    ) -> anyhow::Result<Value> {
        let location = args
            .get("location")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let unit = args.get("unit").and_then(Value::as_str).unwrap_or("celsius");

        if unit != "celsius" && unit != "fahrenheit" {
            anyhow::bail!("unit must be 'celsius' or 'fahrenheit', got '{unit}'");
        }

        log::info!("getting weather for {location} in {unit}");

        Ok(json!({
            "location": location,
            "temperature": if unit == "celsius" { 22 } else { 72 },
            "unit": unit,
            "conditions": "Sunny",
            "humidity": 45,
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), json!(value)))
            .collect()
    }

    #[tokio::test]
    async fn returns_celsius_by_default() {
        let result = GetWeather
            .call(&FunctionContext::new(), &args(&[("location", "Berlin")]))
            .await
            .expect("weather");

        assert_eq!(result["location"], "Berlin");
        assert_eq!(result["temperature"], 22);
        assert_eq!(result["unit"], "celsius");
    }

    #[tokio::test]
    async fn honors_fahrenheit_unit() {
        let result = GetWeather
            .call(
                &FunctionContext::new(),
                &args(&[("location", "Austin, TX"), ("unit", "fahrenheit")]),
            )
            .await
            .expect("weather");

        assert_eq!(result["temperature"], 72);
    }

    #[tokio::test]
    async fn rejects_unknown_unit() {
        let error = GetWeather
            .call(
                &FunctionContext::new(),
                &args(&[("location", "Berlin"), ("unit", "kelvin")]),
            )
            .await
            .expect_err("must fail");

        assert!(error.to_string().contains("kelvin"));
    }

    #[test]
    fn schema_requires_location_only() {
        let schema = GetWeather.schema();

        assert_eq!(schema.name, "get_weather");
        assert_eq!(schema.parameters.required, vec!["location".to_string()]);
        assert_eq!(
            schema.parameters.properties["unit"]
                .allowed_values
                .as_deref(),
            Some(&["celsius".to_string(), "fahrenheit".to_string()][..])
        );
    }
}
