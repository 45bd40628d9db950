use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid value ({0}) given for recurs on. Can only be year or month.")]
    InvalidRecurrenceMode(String),
}
