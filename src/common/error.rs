use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid random variable '{input}': {reason}")]
    RandomVariableParse { input: String, reason: String },

    #[error("Agent not found: {id}")]
    AgentNotFound { id: u32 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DomainError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] std::io::Error),

    #[error("Logger error: {0}")]
    Logger(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
