use mz_agent::AgentError;
use mz_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} count {got} does not match group count {expected}")]
    GroupCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("invalid configuration: {0}")]
    Core(#[from] CoreError),

    #[error("group store error: {0}")]
    Agent(#[from] AgentError),
}

pub type SimResult<T> = Result<T, SimError>;
