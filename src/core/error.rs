use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Unknown spawn mode: {0}")]
    UnknownSpawnMode(String),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Unknown world shape: {0}")]
    UnknownWorldShape(String),

    #[error("Unknown world theme: {0}")]
    UnknownWorldTheme(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
