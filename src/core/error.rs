use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Territory ring needs at least {minimum} distinct vertices, got {count}")]
    DegenerateRing { count: usize, minimum: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("A claim is already in progress")]
    ClaimInProgress,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
