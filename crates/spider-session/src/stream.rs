use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use spider_core::{FunctionCallAccumulator, FunctionInvocation};
use spider_llm::{ChunkStream, StreamChunk};

use crate::error::SessionError;
use crate::events::SessionEvent;

pub struct StreamOutput {
    pub content: String,
    pub function_call: Option<FunctionInvocation>,
}

/// Drain one transport stream: forward tokens as events, accumulate
/// function-call deltas, honor cancellation.
///
/// On cancellation or stream error the caller must not commit any partial
/// assistant turn; this function only reports what was seen.
pub async fn consume_chunk_stream(
    mut stream: ChunkStream,
    event_tx: &mpsc::Sender<SessionEvent>,
    cancel: &CancellationToken,
) -> Result<StreamOutput, SessionError> {
    let mut content = String::new();
    let mut accumulator = FunctionCallAccumulator::new();

    while let Some(chunk_result) = stream.next().await {
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        match chunk_result {
            Ok(StreamChunk::Token(token)) => {
                if token.is_empty() {
                    continue;
                }
                content.push_str(&token);
                let _ = event_tx.send(SessionEvent::Token { content: token }).await;
            }
            Ok(StreamChunk::FunctionCall(delta)) => {
                accumulator.update(delta);
            }
            Ok(StreamChunk::Done) => {
                log::debug!("transport stream completed");
            }
            Err(error) => {
                let message = format!("stream error: {error}");
                let _ = event_tx.send(SessionEvent::Error { message }).await;
                return Err(SessionError::Transport(error));
            }
        }
    }

    Ok(StreamOutput {
        content,
        function_call: accumulator.finalize(),
    })
}
