use std::sync::Arc;

use serde_json::Map;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use spider_core::{FunctionInvocation, FunctionRegistry, FunctionSchema, Turn};
use spider_llm::ChatTransport;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::events::SessionEvent;
use crate::focus::encode_input;
use crate::history::select_history;
use crate::stream::consume_chunk_stream;

/// Per-call options. Overrides apply to exactly one call and never mutate the
/// session's stored defaults.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Focus-mode override for this call only.
    pub focus_mode: Option<bool>,
    /// Call-scoped schemas advertised in addition to the registry's.
    pub extra_schemas: Vec<FunctionSchema>,
}

/// A multi-turn conversation bound to one system prompt.
///
/// Not safe for concurrent `chat` calls on the same session: the turn log
/// must grow in chronological order, so callers serialize access (`&mut self`
/// enforces this). Independent sessions may share the registry freely.
pub struct ConversationSession {
    system_prompt: String,
    turns: Vec<Turn>,
    transport: Arc<dyn ChatTransport>,
    registry: Arc<FunctionRegistry>,
    config: SessionConfig,
}

impl ConversationSession {
    pub fn new(
        system_prompt: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
        registry: Arc<FunctionRegistry>,
        config: SessionConfig,
    ) -> Self {
        let system_prompt = system_prompt.into();
        log::info!(
            "session created: model={}, budget={}, focus_mode={}, functions={}",
            config.model,
            config.max_history_budget,
            config.focus_mode,
            registry.len()
        );

        Self {
            system_prompt,
            turns: Vec::new(),
            transport,
            registry,
            config,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.model = model.into();
    }

    pub fn max_history_budget(&self) -> u32 {
        self.config.max_history_budget
    }

    pub fn set_max_history_budget(&mut self, budget: u32) {
        self.config.max_history_budget = budget;
    }

    pub fn focus_mode(&self) -> bool {
        self.config.focus_mode
    }

    pub fn set_focus_mode(&mut self, focus_mode: bool) {
        self.config.focus_mode = focus_mode;
    }

    /// Read-only snapshot of the turn log.
    pub fn history(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Drop all turns; the system prompt and configuration are kept.
    pub fn clear_history(&mut self) {
        self.turns.clear();
        log::info!("chat history cleared");
    }

    /// Send one user message and run the function loop to final content.
    pub async fn chat(&mut self, input: &str, options: ChatOptions) -> Result<String> {
        let (mut messages, schemas) = self.start_call(input, &options);

        for round in 0..self.config.max_function_rounds {
            let completion = self
                .transport
                .complete(&messages, &schemas, &self.config.model)
                .await?;

            match completion.function_call {
                Some(call) => {
                    log::debug!("round {}: model requested function '{}'", round + 1, call.name);
                    let result_turn = self.run_function_call(call, &mut messages, None).await;
                    messages.push(result_turn);
                }
                None => {
                    let content = completion.content;
                    self.turns.push(Turn::assistant(content.clone()));
                    return Ok(content);
                }
            }
        }

        Err(SessionError::FunctionLoopExceeded {
            rounds: self.config.max_function_rounds,
        })
    }

    /// Send one user message, streaming fragments over `event_tx`.
    ///
    /// Returns the final assistant content, which is also emitted as
    /// [`SessionEvent::Complete`]. A cancelled call leaves the turn log
    /// without any partially streamed assistant turn.
    pub async fn chat_streaming(
        &mut self,
        input: &str,
        options: ChatOptions,
        event_tx: mpsc::Sender<SessionEvent>,
        cancel: CancellationToken,
    ) -> Result<String> {
        let (mut messages, schemas) = self.start_call(input, &options);

        for round in 0..self.config.max_function_rounds {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }

            let stream = self
                .transport
                .complete_stream(&messages, &schemas, &self.config.model)
                .await?;

            let output = consume_chunk_stream(stream, &event_tx, &cancel).await?;

            match output.function_call {
                Some(call) => {
                    log::debug!("round {}: model requested function '{}'", round + 1, call.name);
                    let result_turn = self
                        .run_function_call(call, &mut messages, Some(&event_tx))
                        .await;
                    messages.push(result_turn);
                }
                None => {
                    let content = output.content;
                    self.turns.push(Turn::assistant(content.clone()));
                    let _ = event_tx
                        .send(SessionEvent::Complete {
                            content: content.clone(),
                        })
                        .await;
                    return Ok(content);
                }
            }
        }

        Err(SessionError::FunctionLoopExceeded {
            rounds: self.config.max_function_rounds,
        })
    }

    /// START + ASSEMBLE: encode the input, select history, append the user
    /// turn to the log, and resolve the advertised schemas.
    fn start_call(&mut self, input: &str, options: &ChatOptions) -> (Vec<Turn>, Vec<FunctionSchema>) {
        let focus_mode = options.focus_mode.unwrap_or(self.config.focus_mode);
        let user_turn = Turn::user(encode_input(input, focus_mode));
        let system_turn = Turn::system(self.system_prompt.clone());

        let estimator = self.config.estimator.as_ref();
        let reserved = estimator
            .estimate_turn(&system_turn)
            .saturating_add(estimator.estimate_turn(&user_turn));

        let selected = select_history(
            &self.turns,
            reserved,
            self.config.max_history_budget,
            estimator,
        );

        log::debug!(
            "assembled prompt: {} history turns of {} (reserved {reserved} units)",
            selected.len(),
            self.turns.len()
        );

        let mut messages = Vec::with_capacity(selected.len() + 2);
        messages.push(system_turn);
        messages.extend_from_slice(selected);
        messages.push(user_turn.clone());

        self.turns.push(user_turn);

        (messages, self.advertised_schemas(&options.extra_schemas))
    }

    /// DECIDE: record the assistant's function-call turn, dispatch it, and
    /// record the outcome as a function-result turn. Dispatch failures are
    /// recovered into the result turn so the model can react to them.
    async fn run_function_call(
        &mut self,
        call: FunctionInvocation,
        messages: &mut Vec<Turn>,
        event_tx: Option<&mpsc::Sender<SessionEvent>>,
    ) -> Turn {
        let call_turn = Turn::assistant_call(call.clone());
        self.turns.push(call_turn.clone());
        messages.push(call_turn);

        if let Some(event_tx) = event_tx {
            let _ = event_tx
                .send(SessionEvent::FunctionCallStarted {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                })
                .await;
        }

        let args = call
            .arguments
            .as_object()
            .cloned()
            .unwrap_or_else(Map::new);

        let content = match self.registry.execute(&call.name, &args).await {
            Ok(result) => result.to_string(),
            Err(error) => {
                log::warn!("function dispatch failed: {error}");
                error.to_result_value().to_string()
            }
        };

        if let Some(event_tx) = event_tx {
            let _ = event_tx
                .send(SessionEvent::FunctionResult {
                    name: call.name.clone(),
                    content: content.clone(),
                })
                .await;
        }

        let result_turn = Turn::function_result(call.name, content);
        self.turns.push(result_turn.clone());
        result_turn
    }

    /// Registry schemas plus call-scoped additions, sorted and deduplicated
    /// by name (first occurrence wins).
    fn advertised_schemas(&self, extra: &[FunctionSchema]) -> Vec<FunctionSchema> {
        let mut schemas = self.registry.schemas();
        schemas.extend_from_slice(extra);
        schemas.sort_by(|left, right| left.name.cmp(&right.name));
        schemas.dedup_by(|left, right| left.name == right.name);
        schemas
    }
}
