use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum SumarioError {
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    #[error("A book with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Admin authorization failed")]
    Unauthorized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SumarioError>;
