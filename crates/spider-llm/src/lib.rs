//! spider-llm - LLM transport boundary
//!
//! Defines the [`ChatTransport`] trait the session core depends on, the
//! OpenAI-compatible wire protocol helpers, a shared SSE stream adapter, and
//! the [`OpenAiTransport`] implementation with bounded transient retry.

pub mod openai;
pub mod protocol;
pub mod sse;
pub mod transport;
pub mod types;

pub use openai::{OpenAiConfig, OpenAiTransport};
pub use transport::{ChatTransport, ChunkStream, Result, TransportError};
pub use types::{Completion, StreamChunk};
