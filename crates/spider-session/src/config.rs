use std::sync::Arc;

use spider_core::{CharRatioEstimator, SharedEstimator};

/// Configuration for a conversation session.
///
/// Every value is explicit at construction time; nothing reads process-wide
/// mutable defaults.
#[derive(Clone)]
pub struct SessionConfig {
    /// Model identifier passed to the transport.
    pub model: String,
    /// Budget (in estimator units) for system prompt + history + pending input.
    pub max_history_budget: u32,
    /// Default focus-mode flag; individual calls may override it.
    pub focus_mode: bool,
    /// Upper bound on CALL<->DECIDE iterations within one chat call.
    pub max_function_rounds: usize,
    /// Estimator used for history selection.
    pub estimator: SharedEstimator,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo-preview".to_string(),
            max_history_budget: 4000,
            focus_mode: false,
            max_function_rounds: 10,
            estimator: Arc::new(CharRatioEstimator::default()),
        }
    }
}
