use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient resources for '{action}': need {needed:.1} {resource}, have {available:.1}")]
    InsufficientResources {
        action: String,
        resource: String,
        needed: f64,
        available: f64,
    },

    #[error("Unknown rule reference: {0}")]
    UnknownRuleReference(String),

    #[error("Rule base error: {0}")]
    RuleBase(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
