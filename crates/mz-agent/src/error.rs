use mz_core::GroupId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("group name '{0}' is already in use")]
    DuplicateName(String),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),
}

pub type AgentResult<T> = Result<T, AgentError>;
