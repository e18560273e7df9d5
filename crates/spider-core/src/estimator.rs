//! Budget-unit estimation for history selection.
//!
//! Exact tokenization is provider-specific; selection only needs a
//! deterministic, monotonic approximation, so the default estimator uses a
//! fixed characters-per-unit ratio plus per-turn overhead.

use crate::turn::Turn;
use std::sync::Arc;

/// Trait for budget-unit estimation implementations.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the cost of a plain text string in budget units.
    fn estimate_text(&self, text: &str) -> u32;

    /// Estimate the cost of a single turn, including per-turn overhead.
    fn estimate_turn(&self, turn: &Turn) -> u32;

    /// Estimate the cost of multiple turns.
    fn estimate_turns(&self, turns: &[Turn]) -> u32 {
        turns
            .iter()
            .map(|turn| self.estimate_turn(turn))
            .fold(0u32, |acc, cost| acc.saturating_add(cost))
    }
}

/// Character-ratio estimator.
///
/// Uses the approximation: units ≈ characters / `chars_per_unit`, rounded up,
/// plus a fixed `turn_overhead` per turn for role/name framing. Defaults
/// (4 chars per unit, 4 units overhead) mirror the usual chat-wire framing.
#[derive(Debug, Clone)]
pub struct CharRatioEstimator {
    chars_per_unit: f64,
    turn_overhead: u32,
}

impl CharRatioEstimator {
    pub fn new(chars_per_unit: f64, turn_overhead: u32) -> Self {
        Self {
            chars_per_unit,
            turn_overhead,
        }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4.0, 4)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate_text(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let char_count = text.chars().count() as f64;
        (char_count / self.chars_per_unit).ceil() as u32
    }

    fn estimate_turn(&self, turn: &Turn) -> u32 {
        let content_units = self.estimate_text(&turn.content);

        let call_units = turn
            .function_call
            .as_ref()
            .map(|call| {
                let arguments = call.arguments.to_string();
                self.estimate_text(&call.name)
                    .saturating_add(self.estimate_text(&arguments))
            })
            .unwrap_or(0);

        let name_units = turn
            .function_name
            .as_ref()
            .map(|name| self.estimate_text(name))
            .unwrap_or(0);

        content_units
            .saturating_add(call_units)
            .saturating_add(name_units)
            .saturating_add(self.turn_overhead)
    }
}

/// Arc-wrapped estimator for easy sharing.
pub type SharedEstimator = Arc<dyn TokenEstimator>;
