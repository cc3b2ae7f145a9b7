use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("embedding error: {0}")]
    Embedding(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AssistantError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        AssistantError::Internal(err.to_string())
    }

    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        AssistantError::Storage(err.to_string())
    }
}
