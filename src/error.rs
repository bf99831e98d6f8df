use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Storage quota exceeded for '{key}' ({size} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Step not found: {0}")]
    StepNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
