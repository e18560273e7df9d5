use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::functions::context::FunctionContext;
use crate::functions::types::{FunctionSchema, ParameterSpec, ParametersSchema};

/// A named, schema-described capability the model may request.
#[async_trait]
pub trait Function: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> BTreeMap<String, ParameterSpec>;

    /// Parameter names that must be present before the handler runs.
    fn required(&self) -> Vec<String> {
        Vec::new()
    }

    async fn call(&self, context: &FunctionContext, args: &Map<String, Value>)
        -> anyhow::Result<Value>;

    fn schema(&self) -> FunctionSchema {
        FunctionSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: ParametersSchema::object(self.parameters(), self.required()),
        }
    }
}

pub type SharedFunction = Arc<dyn Function>;

/// Configuration errors raised while building a registry. Fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("function with name '{0}' already registered")]
    DuplicateName(String),

    #[error("function declares an empty name")]
    MissingName,
}

/// Dispatch failures, returned as values so the conversation loop can feed
/// them back to the model as a function-result turn instead of crashing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("function not found: {name}")]
    UnknownFunction { name: String },

    #[error("function '{function}' missing required parameter '{parameter}'")]
    MissingRequiredParameter { function: String, parameter: String },

    #[error("function '{function}' failed: {message}")]
    Handler { function: String, message: String },
}

impl DispatchError {
    /// Structured payload for a function-result turn.
    pub fn to_result_value(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Immutable lookup table from capability name to handler.
///
/// Built once at startup from an explicitly supplied collection; read-only
/// afterwards, so it can be shared across sessions without synchronization.
pub struct FunctionRegistry {
    functions: HashMap<String, SharedFunction>,
    context: FunctionContext,
}

impl FunctionRegistry {
    pub fn build(
        context: FunctionContext,
        candidates: impl IntoIterator<Item = SharedFunction>,
    ) -> Result<Self, RegistryError> {
        let mut functions: HashMap<String, SharedFunction> = HashMap::new();

        for function in candidates {
            let name = function.name().trim();
            if name.is_empty() {
                return Err(RegistryError::MissingName);
            }
            if functions.contains_key(name) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
            log::debug!("registered function: {name}");
            functions.insert(name.to_string(), function);
        }

        Ok(Self { functions, context })
    }

    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
            context: FunctionContext::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Export schemas for every registered capability, sorted by name.
    pub fn schemas(&self) -> Vec<FunctionSchema> {
        let mut schemas: Vec<FunctionSchema> = self
            .functions
            .values()
            .map(|function| function.schema())
            .collect();
        schemas.sort_by(|left, right| left.name.cmp(&right.name));
        schemas
    }

    /// Dispatch a capability by name.
    ///
    /// Required parameters are checked before the handler runs; handler
    /// failures are caught and wrapped so a single faulty capability cannot
    /// terminate the conversation.
    pub async fn execute(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| DispatchError::UnknownFunction {
                name: name.to_string(),
            })?;

        for parameter in function.required() {
            if !args.contains_key(&parameter) {
                return Err(DispatchError::MissingRequiredParameter {
                    function: name.to_string(),
                    parameter,
                });
            }
        }

        match function.call(&self.context, args).await {
            Ok(result) => Ok(result),
            Err(error) => {
                log::error!("error executing function {name}: {error}");
                Err(DispatchError::Handler {
                    function: name.to_string(),
                    message: error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestFunction {
        name: &'static str,
        required: Vec<String>,
        invocations: Arc<AtomicUsize>,
    }

    impl TestFunction {
        fn named(name: &'static str) -> Self {
            Self {
                name,
                required: Vec::new(),
                invocations: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_required(name: &'static str, required: &[&str]) -> Self {
            Self {
                name,
                required: required.iter().map(|r| r.to_string()).collect(),
                invocations: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Function for TestFunction {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "test function"
        }

        fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
            self.required
                .iter()
                .map(|name| (name.clone(), ParameterSpec::string("a test parameter")))
                .collect()
        }

        fn required(&self) -> Vec<String> {
            self.required.clone()
        }

        async fn call(
            &self,
            _context: &FunctionContext,
            _args: &Map<String, Value>,
        ) -> anyhow::Result<Value> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"status": "success"}))
        }
    }

    struct FailingFunction;

    #[async_trait]
    impl Function for FailingFunction {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
            BTreeMap::new()
        }

        async fn call(
            &self,
            _context: &FunctionContext,
            _args: &Map<String, Value>,
        ) -> anyhow::Result<Value> {
            anyhow::bail!("handler exploded")
        }
    }

    fn build_registry(functions: Vec<SharedFunction>) -> FunctionRegistry {
        FunctionRegistry::build(FunctionContext::new(), functions).expect("build registry")
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let result = FunctionRegistry::build(
            FunctionContext::new(),
            vec![
                Arc::new(TestFunction::named("dup")) as SharedFunction,
                Arc::new(TestFunction::named("dup")) as SharedFunction,
            ],
        );

        assert!(matches!(result, Err(RegistryError::DuplicateName(name)) if name == "dup"));
    }

    #[test]
    fn build_rejects_empty_names() {
        let result = FunctionRegistry::build(
            FunctionContext::new(),
            vec![Arc::new(TestFunction::named("")) as SharedFunction],
        );

        assert!(matches!(result, Err(RegistryError::MissingName)));
    }

    #[test]
    fn schemas_are_sorted_by_name() {
        let registry = build_registry(vec![
            Arc::new(TestFunction::named("zeta")),
            Arc::new(TestFunction::named("alpha")),
        ]);

        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0].name, "alpha");
        assert_eq!(schemas[1].name, "zeta");
    }

    #[tokio::test]
    async fn execute_unknown_function_returns_error_without_invoking() {
        let function = TestFunction::named("known");
        let invocations = Arc::clone(&function.invocations);
        let registry = build_registry(vec![Arc::new(function)]);

        let result = registry.execute("nonexistent", &Map::new()).await;

        assert!(
            matches!(result, Err(DispatchError::UnknownFunction { name }) if name == "nonexistent")
        );
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn execute_checks_required_parameters_before_handler() {
        let function = TestFunction::with_required("f", &["x"]);
        let invocations = Arc::clone(&function.invocations);
        let registry = build_registry(vec![Arc::new(function)]);

        let result = registry.execute("f", &Map::new()).await;

        assert!(matches!(
            result,
            Err(DispatchError::MissingRequiredParameter { function, parameter })
                if function == "f" && parameter == "x"
        ));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn execute_invokes_handler_when_required_present() {
        let function = TestFunction::with_required("f", &["x"]);
        let invocations = Arc::clone(&function.invocations);
        let registry = build_registry(vec![Arc::new(function)]);

        let mut args = Map::new();
        args.insert("x".to_string(), json!("value"));
        let result = registry.execute("f", &args).await.expect("success");

        assert_eq!(result["status"], "success");
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_failure_is_caught_as_dispatch_error() {
        let registry = build_registry(vec![Arc::new(FailingFunction)]);

        let result = registry.execute("broken", &Map::new()).await;

        assert!(matches!(
            result,
            Err(DispatchError::Handler { function, message })
                if function == "broken" && message.contains("handler exploded")
        ));
    }

    #[test]
    fn dispatch_error_converts_to_result_value() {
        let error = DispatchError::UnknownFunction {
            name: "missing".to_string(),
        };

        let value = error.to_result_value();
        assert_eq!(value["error"], "function not found: missing");
    }
}
