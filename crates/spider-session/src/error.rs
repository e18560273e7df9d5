use spider_llm::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("function loop exceeded {rounds} rounds without final content")]
    FunctionLoopExceeded { rounds: usize },

    #[error("chat was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SessionError>;
