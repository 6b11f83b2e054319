use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("path record encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
