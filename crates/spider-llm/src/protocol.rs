//! OpenAI-compatible request and response shapes.
//!
//! The wire uses the chat-completions `functions` / `function_call` fields:
//! assistant turns carry one optional `function_call` and results go back as
//! `role: "function"` messages keyed by name, mirroring the internal [`Turn`]
//! shape. These helpers build the JSON body without leaking internal fields
//! (`id`, `created_at`).

use serde::Deserialize;
use serde_json::{json, Map, Value};
use spider_core::{FunctionCallDelta, FunctionInvocation, FunctionSchema, Role, Turn};

use crate::transport::Result;
use crate::types::{Completion, StreamChunk};

/// Convert internal [`Turn`] values to the wire `messages` array.
pub fn turns_to_wire_json(turns: &[Turn]) -> Vec<Value> {
    turns
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Function => "function",
            };

            let mut message = json!({
                "role": role,
                "content": turn.content,
            });

            if let Some(call) = &turn.function_call {
                // The wire carries arguments as a JSON-encoded string.
                message["function_call"] = json!({
                    "name": call.name,
                    "arguments": call.arguments.to_string(),
                });
            }

            if let Some(name) = &turn.function_name {
                message["name"] = json!(name);
            }

            message
        })
        .collect()
}

/// Build a chat-completions request body.
pub fn build_chat_body(
    model: &str,
    turns: &[Turn],
    schemas: &[FunctionSchema],
    stream: bool,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": turns_to_wire_json(turns),
        "stream": stream,
    });

    if !schemas.is_empty() {
        body["functions"] = json!(schemas);
    }

    if let Some(temperature) = temperature {
        body["temperature"] = json!(temperature);
    }

    if let Some(max_tokens) = max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }

    body
}

// --- Non-streaming response parsing ---

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: Option<String>,
    function_call: Option<WireFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: Option<String>,
}

fn parse_wire_arguments(name: &str, arguments: Option<&str>) -> Value {
    let Some(arguments) = arguments else {
        return Value::Object(Map::new());
    };

    if arguments.trim().is_empty() {
        return Value::Object(Map::new());
    }

    serde_json::from_str(arguments).unwrap_or_else(|error| {
        log::warn!("unparseable arguments for function '{name}': {error}");
        Value::Object(Map::new())
    })
}

/// Convert a parsed chat-completions response into a [`Completion`].
pub fn completion_from_response(response: ChatCompletionResponse) -> Completion {
    let Some(choice) = response.choices.into_iter().next() else {
        return Completion::content(String::new());
    };

    if let Some(call) = choice.message.function_call {
        let arguments = parse_wire_arguments(&call.name, call.arguments.as_deref());
        return Completion {
            content: choice.message.content.unwrap_or_default(),
            function_call: Some(FunctionInvocation::new(call.name, arguments)),
        };
    }

    Completion::content(choice.message.content.unwrap_or_default())
}

// --- Streaming chunk parsing ---

#[derive(Debug, Deserialize)]
pub struct StreamChunkWire {
    choices: Vec<StreamChoiceWire>,
}

#[derive(Debug, Deserialize)]
struct StreamChoiceWire {
    delta: DeltaWire,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DeltaWire {
    content: Option<String>,
    #[allow(dead_code)]
    role: Option<String>,
    function_call: Option<FunctionCallDeltaWire>,
}

#[derive(Debug, Deserialize)]
struct FunctionCallDeltaWire {
    name: Option<String>,
    arguments: Option<String>,
}

/// Convert a single parsed stream chunk into a [`StreamChunk`].
pub fn parse_stream_chunk(chunk: StreamChunkWire) -> StreamChunk {
    let Some(choice) = chunk.choices.into_iter().next() else {
        return StreamChunk::Token(String::new());
    };

    if let Some(call) = choice.delta.function_call {
        return StreamChunk::FunctionCall(FunctionCallDelta {
            name: call.name.unwrap_or_default(),
            arguments: call.arguments.unwrap_or_default(),
        });
    }

    if let Some(content) = choice.delta.content {
        return StreamChunk::Token(content);
    }

    StreamChunk::Token(String::new())
}

/// Parse an SSE `data:` payload.
///
/// - `"[DONE]"` -> `StreamChunk::Done`
/// - Invalid JSON -> error
pub fn parse_sse_data(data: &str) -> Result<StreamChunk> {
    if data.trim() == "[DONE]" {
        return Ok(StreamChunk::Done);
    }

    let chunk: StreamChunkWire = serde_json::from_str(data)?;
    Ok(parse_stream_chunk(chunk))
}
