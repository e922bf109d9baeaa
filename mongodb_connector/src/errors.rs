use common::errors::InputError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Database operation failed: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("{0}")]
    InvalidInput(#[from] InputError),
    #[error("{0} already exists")]
    Duplicate(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Unexpected inserted id for {0}")]
    UnexpectedId(String),
}

impl ConnectorError {
    /// Turns a unique index violation into [`ConnectorError::Duplicate`].
    pub(crate) fn from_write(err: mongodb::error::Error, subject: &str) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(ref write_error)) = *err.kind
            && write_error.code == DUPLICATE_KEY_CODE
        {
            return Self::Duplicate(subject.to_string());
        }

        Self::Database(err)
    }
}
