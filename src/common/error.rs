use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown learning rate method: {0}")]
    UnknownMethod(String),

    #[error("Step counter is required for the {0} learning rate schedule")]
    MissingStep(&'static str),

    #[error("Missing parameter '{name}' for the {method} learning rate schedule")]
    MissingParameter { method: &'static str, name: &'static str },

    #[error("Unexpected parameter '{name}' for the {method} learning rate schedule")]
    UnexpectedParameter { method: &'static str, name: String },
}
