use std::path::PathBuf;
use thiserror::Error;

use crate::query::QueryError;
use crate::token::TokenError;

/// Error taxonomy shared by every service operation.
///
/// Each variant maps to one envelope code; anything a service cannot
/// classify surfaces as `Database` and is reported as an internal failure.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Data integrity violated: {message}")]
    Integrity { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Authorization error: {0}")]
    Auth(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ServiceError {
    /// Shorthand for a validation failure with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a missing-record failure.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a data-integrity failure.
    pub fn integrity(message: impl Into<String>) -> Self {
        ServiceError::Integrity {
            message: message.into(),
        }
    }
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Database(source) => ServiceError::Database(source),
            other => ServiceError::Validation {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move file from '{from}' to '{to}': {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media type for '{filename}' (images and videos only)")]
    UnsupportedMedia { filename: String },

    #[error("Invalid stored file name: {name}")]
    InvalidName { name: String },
}

pub type Result<T> = std::result::Result<T, ServiceError>;
