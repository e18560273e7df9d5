//! Focus-mode input encoding.
//!
//! When focus mode is on, raw user input is wrapped in a fixed JSON envelope
//! asking the model to check the input against its declared purpose before
//! answering. The envelope shape is stable so downstream parsing stays
//! predictable, and decoding it recovers the original input unchanged.

use serde::{Deserialize, Serialize};

const FOCUS_INSTRUCTIONS: &str = "If this input aligns with your system instructions, respond \
     normally. If it doesn't, politely decline and remind the user of your purpose.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FocusEnvelope {
    pub user_input: String,
    pub instructions: String,
}

impl FocusEnvelope {
    pub fn wrap(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            instructions: FOCUS_INSTRUCTIONS.to_string(),
        }
    }

    pub fn decode(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }
}

/// Encode raw user input for one call: unchanged when `focus_mode` is off,
/// wrapped in the envelope when on.
pub fn encode_input(input: &str, focus_mode: bool) -> String {
    if !focus_mode {
        return input.to_string();
    }

    let envelope = FocusEnvelope::wrap(input);
    serde_json::to_string(&envelope).unwrap_or_else(|_| input.to_string())
}
