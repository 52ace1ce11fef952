//! Error handlers
//!
//! Maps errors to HTTP status codes and HTML bodies.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::{error, warn};

use crate::error::types::{CloudServerError, RequestError, StorageError};
use crate::protocol::responses::{escape_html, failure_page};

/// Log a cloud server error at a level matching its severity
pub fn handle_error(err: &CloudServerError) {
    match error_to_http_status(err) {
        status if status.is_server_error() => error!("Cloud Server Error: {}", err),
        _ => warn!("Rejected request: {}", err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_http_status(err: &CloudServerError) -> StatusCode {
    match err {
        CloudServerError::Request(RequestError::Multipart { status, .. }) => *status,
        CloudServerError::Request(_) => StatusCode::BAD_REQUEST,
        CloudServerError::Storage(e) => match e {
            StorageError::FileNotFound(_) => StatusCode::NOT_FOUND,
            StorageError::InvalidPath(_) | StorageError::PathTraversal(_) => {
                StatusCode::BAD_REQUEST
            }
            StorageError::FileAlreadyExists(_) | StorageError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
        CloudServerError::List(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CloudServerError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CloudServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// HTML body shown to the caller for an error
pub fn error_to_body(err: &CloudServerError) -> String {
    match err {
        CloudServerError::Request(e) => match e {
            RequestError::NoFolder => {
                failure_page("<h1>No folder supplied or an invalid folder was supplied</h1>")
            }
            RequestError::InvalidFolderIndex(_) => failure_page("<h1>Invalid index folder</h1>"),
            RequestError::NoFiles => failure_page("<h1>No files supplied</h1>"),
            RequestError::InvalidFilename(name) => {
                failure_page(&format!("<h1>Invalid file name</h1> {}", escape_html(name)))
            }
            // No refresh: the caller is expected to fix the query string
            RequestError::MissingArgument(arg) => format!("<h1>Missing \"{}\" argument</h1>", arg),
            RequestError::Multipart { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                failure_page("<h1>Upload too large</h1>")
            }
            RequestError::Multipart { message, .. } => {
                failure_page(&format!("<h1>Malformed upload</h1> {}", escape_html(message)))
            }
        },
        CloudServerError::Storage(StorageError::FileNotFound(p)) => {
            failure_page(&format!("<h1>File not found</h1> {}", escape_html(p)))
        }
        CloudServerError::Storage(StorageError::InvalidPath(p))
        | CloudServerError::Storage(StorageError::PathTraversal(p)) => {
            failure_page(&format!("<h1>Invalid path</h1> {}", escape_html(p)))
        }
        _ => "<h1>Internal server error</h1>".to_string(),
    }
}

impl IntoResponse for CloudServerError {
    fn into_response(self) -> Response {
        handle_error(&self);
        (error_to_http_status(&self), Html(error_to_body(&self))).into_response()
    }
}
