use serde_json::{Map, Value};

use crate::turn::FunctionInvocation;

/// One streamed fragment of a function-call request.
///
/// Providers emit the name on the first delta and append argument text on
/// later deltas; either field may be empty on any given fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionCallDelta {
    pub name: String,
    pub arguments: String,
}

/// Accumulates streamed function-call deltas into one invocation.
#[derive(Debug, Default, Clone)]
pub struct FunctionCallAccumulator {
    name: String,
    arguments: String,
}

impl FunctionCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, delta: FunctionCallDelta) {
        if !delta.name.is_empty() {
            self.name = delta.name;
        }
        self.arguments.push_str(&delta.arguments);
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.arguments.is_empty()
    }

    /// Finalize into an invocation; `None` when no named call was streamed.
    ///
    /// Argument text that is not valid JSON degrades to an empty object so a
    /// malformed model response cannot abort the round.
    pub fn finalize(self) -> Option<FunctionInvocation> {
        if self.name.trim().is_empty() {
            return None;
        }

        let arguments = if self.arguments.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&self.arguments).unwrap_or_else(|error| {
                log::warn!(
                    "discarding unparseable arguments for function '{}': {error}",
                    self.name
                );
                Value::Object(Map::new())
            })
        };

        Some(FunctionInvocation {
            name: self.name,
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delta(name: &str, arguments: &str) -> FunctionCallDelta {
        FunctionCallDelta {
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[test]
    fn accumulator_merges_partial_arguments() {
        let mut accumulator = FunctionCallAccumulator::new();

        accumulator.update(delta("get_weather", "{\"location\": \""));
        accumulator.update(delta("", "Berlin"));
        accumulator.update(delta("", "\"}"));

        let call = accumulator.finalize().expect("call");
        assert_eq!(call.name, "get_weather");
        assert_eq!(call.arguments, json!({"location": "Berlin"}));
    }

    #[test]
    fn finalize_without_name_yields_none() {
        let mut accumulator = FunctionCallAccumulator::new();
        accumulator.update(delta("", "{\"orphan\": true}"));

        assert!(accumulator.finalize().is_none());
    }

    #[test]
    fn empty_arguments_become_empty_object() {
        let mut accumulator = FunctionCallAccumulator::new();
        accumulator.update(delta("no_args", ""));

        let call = accumulator.finalize().expect("call");
        assert_eq!(call.arguments, json!({}));
    }

    #[test]
    fn invalid_argument_json_degrades_to_empty_object() {
        let mut accumulator = FunctionCallAccumulator::new();
        accumulator.update(delta("f", "{not json"));

        let call = accumulator.finalize().expect("call");
        assert_eq!(call.arguments, json!({}));
    }

    #[test]
    fn fresh_accumulator_is_empty() {
        let accumulator = FunctionCallAccumulator::new();
        assert!(accumulator.is_empty());
        assert!(accumulator.finalize().is_none());
    }
}
