use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioPadError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("CLI argument error: {0}")]
    Cli(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScenarioPadError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ScenarioPadError::Storage(msg.into())
    }

    pub fn invalid_storage_key<S: Into<String>>(key: S) -> Self {
        ScenarioPadError::InvalidStorageKey(key.into())
    }

    pub fn clipboard<S: Into<String>>(msg: S) -> Self {
        ScenarioPadError::Clipboard(msg.into())
    }

    pub fn cli<S: Into<String>>(msg: S) -> Self {
        ScenarioPadError::Cli(msg.into())
    }
}

/// Result type alias for scenariopad operations
pub type ScenarioPadResult<T> = Result<T, ScenarioPadError>;
