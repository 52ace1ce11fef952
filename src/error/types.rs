//! Error types
//!
//! Defines domain-specific error types for each module of the cloud server.

use axum::http::StatusCode;
use std::fmt;
use std::io;

/// List store errors (writes only: reads degrade to an empty list)
#[derive(Debug)]
pub enum ListError {
    Io(io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::Io(e) => write!(f, "Failed to write list: {}", e),
            ListError::Encode(e) => write!(f, "Failed to encode list: {}", e),
        }
    }
}

impl std::error::Error for ListError {}

impl From<io::Error> for ListError {
    fn from(error: io::Error) -> Self {
        ListError::Io(error)
    }
}

impl From<serde_json::Error> for ListError {
    fn from(error: serde_json::Error) -> Self {
        ListError::Encode(error)
    }
}

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    FileNotFound(String),
    FileAlreadyExists(String),
    InvalidPath(String),
    PathTraversal(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::FileAlreadyExists(p) => write!(f, "File already exists: {}", p),
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Request validation errors, reported back to the caller as 400
#[derive(Debug)]
pub enum RequestError {
    NoFolder,
    InvalidFolderIndex(usize),
    NoFiles,
    InvalidFilename(String),
    MissingArgument(&'static str),
    /// Unreadable multipart body; `status` is the one axum assigned (400, 413, ...)
    Multipart { status: StatusCode, message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NoFolder => {
                write!(f, "No folder supplied or an invalid folder was supplied")
            }
            RequestError::InvalidFolderIndex(i) => write!(f, "Invalid index folder: {}", i),
            RequestError::NoFiles => write!(f, "No files supplied"),
            RequestError::InvalidFilename(name) => write!(f, "Invalid file name: {}", name),
            RequestError::MissingArgument(arg) => write!(f, "Missing \"{}\" argument", arg),
            RequestError::Multipart { message, .. } => write!(f, "Malformed upload: {}", message),
        }
    }
}

impl std::error::Error for RequestError {}

/// General cloud server error that encompasses all error types
#[derive(Debug)]
pub enum CloudServerError {
    List(ListError),
    Storage(StorageError),
    Request(RequestError),
    IoError(io::Error),
    Internal(String),
}

impl fmt::Display for CloudServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudServerError::List(e) => write!(f, "List error: {}", e),
            CloudServerError::Storage(e) => write!(f, "Storage error: {}", e),
            CloudServerError::Request(e) => write!(f, "Request error: {}", e),
            CloudServerError::IoError(e) => write!(f, "I/O error: {}", e),
            CloudServerError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for CloudServerError {}

impl From<ListError> for CloudServerError {
    fn from(error: ListError) -> Self {
        CloudServerError::List(error)
    }
}

impl From<StorageError> for CloudServerError {
    fn from(error: StorageError) -> Self {
        CloudServerError::Storage(error)
    }
}

impl From<RequestError> for CloudServerError {
    fn from(error: RequestError) -> Self {
        CloudServerError::Request(error)
    }
}

impl From<io::Error> for CloudServerError {
    fn from(error: io::Error) -> Self {
        CloudServerError::IoError(error)
    }
}

impl From<axum::extract::multipart::MultipartError> for CloudServerError {
    fn from(error: axum::extract::multipart::MultipartError) -> Self {
        CloudServerError::Request(RequestError::Multipart {
            status: error.status(),
            message: error.body_text(),
        })
    }
}

impl From<tokio::task::JoinError> for CloudServerError {
    fn from(error: tokio::task::JoinError) -> Self {
        CloudServerError::Internal(format!("blocking task failed: {}", error))
    }
}
