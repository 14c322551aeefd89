use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("write failed: {message}")]
    Write { message: String },

    #[error("database error: {message}")]
    Database { message: String },
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

impl From<rusqlite::Error> for DirectoryError {
    fn from(err: rusqlite::Error) -> Self {
        DirectoryError::Database {
            message: err.to_string(),
        }
    }
}

impl DirectoryError {
    /// Collapses a persistence error into the generic write-failure
    /// surfaced to callers, keeping the cause for server-side logs.
    pub fn into_write_failure(self, record: &str) -> Self {
        match self {
            DirectoryError::NotFound(_) | DirectoryError::Validation(_) => self,
            DirectoryError::Write { .. } => self,
            DirectoryError::Database { message } => DirectoryError::Write {
                message: format!("{record}: {message}"),
            },
        }
    }
}
