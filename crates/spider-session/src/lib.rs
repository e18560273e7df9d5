//! spider-session - Conversational orchestration core
//!
//! [`ConversationSession`] wraps a [`spider_llm::ChatTransport`] with a
//! persistent system prompt, budget-bounded history selection, optional
//! focus-mode input encoding, and a bounded function-call loop dispatching
//! through a shared [`spider_core::FunctionRegistry`].

pub mod config;
pub mod error;
pub mod events;
pub mod focus;
pub mod history;
pub mod session;
pub mod stream;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use events::SessionEvent;
pub use focus::{encode_input, FocusEnvelope};
pub use history::select_history;
pub use session::{ChatOptions, ConversationSession};
