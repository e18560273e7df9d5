use serde::Serialize;
use serde_json::Value;

/// Events emitted during a streaming chat call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A fragment of assistant content.
    Token { content: String },
    /// The model requested a capability; dispatch is about to run.
    FunctionCallStarted { name: String, arguments: Value },
    /// A capability dispatch finished (successfully or as a recovered error).
    FunctionResult { name: String, content: String },
    /// Final assistant content for this chat call.
    Complete { content: String },
    /// The stream failed; the chat call returns an error.
    Error { message: String },
}
