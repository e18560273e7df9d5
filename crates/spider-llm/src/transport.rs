use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use spider_core::{FunctionSchema, Turn};
use thiserror::Error;

use crate::types::{Completion, StreamChunk};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP client error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, TransportError>;

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// External LLM transport boundary.
///
/// Implementations own the network concerns (timeouts, retry of transient
/// failures); callers see either a full [`Completion`] or an ordered, finite,
/// non-restartable sequence of [`StreamChunk`] fragments.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the assembled turns and advertised schemas, wait for the full
    /// completion.
    async fn complete(
        &self,
        turns: &[Turn],
        schemas: &[FunctionSchema],
        model: &str,
    ) -> Result<Completion>;

    /// Send the assembled turns and advertised schemas, stream the response.
    async fn complete_stream(
        &self,
        turns: &[Turn],
        schemas: &[FunctionSchema],
        model: &str,
    ) -> Result<ChunkStream>;
}
