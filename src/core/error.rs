use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM service returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Empty response from LLM service")]
    EmptyResponse,

    #[error("Invalid navigation decision: {0}")]
    Decision(String),

    #[error("API key not set: {0}")]
    MissingApiKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;
