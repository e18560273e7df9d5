use spider_core::{FunctionCallDelta, FunctionInvocation};

/// One non-streaming completion from the transport.
///
/// Carries either final `content` or a `function_call` request; when a
/// provider answers with several calls at once only the first is kept, so a
/// round always maps to at most one capability dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub function_call: Option<FunctionInvocation>,
}

impl Completion {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            function_call: None,
        }
    }

    pub fn function_call(call: FunctionInvocation) -> Self {
        Self {
            content: String::new(),
            function_call: Some(call),
        }
    }
}

/// One fragment of a streaming completion.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// A fragment of assistant content.
    Token(String),
    /// A fragment of a function-call request.
    FunctionCall(FunctionCallDelta),
    /// Terminal sentinel; no further fragments follow.
    Done,
}
