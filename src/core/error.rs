use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Malformed coordinate key '{0}': expected 'x,y'")]
    MalformedCoordKey(String),

    #[error("Cannot take the single position of reference blueprint '{0}': use positions_of")]
    ReferencePosition(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
