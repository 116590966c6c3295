use thiserror::Error;

#[derive(Error, Debug)]
pub enum FertiplanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Guideline table error: {0}")]
    Guidelines(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, FertiplanError>;
