use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineageError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Validation error: {message}")]
    Validation { message: String },
    #[error("Lock poisoned: {0}")]
    Lock(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LineageError>;

// Helper conversions
impl From<rusqlite::Error> for LineageError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}

impl From<::config::ConfigError> for LineageError {
    fn from(e: ::config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl<T> From<std::sync::PoisonError<T>> for LineageError {
    fn from(e: std::sync::PoisonError<T>) -> Self { Self::Lock(e.to_string()) }
}
