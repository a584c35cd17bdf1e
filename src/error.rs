//! Error types with HTTP status code mapping.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Error type for secretaria operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection provider could not hand out a connection.
    #[error("Failed to connect to the database")]
    Connectivity,

    // Request errors
    #[error("{0}")]
    Validation(String),

    /// The database rejected a write statement (constraint, type, key).
    #[error("{0}")]
    Constraint(String),

    #[error("{0}")]
    NotFound(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Constraint(_) | Error::AddrParse(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,

            Error::Connectivity
            | Error::Config(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Database(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response body.
    ///
    /// Server errors other than [`Error::Connectivity`] are replaced by a
    /// generic message; their detail only reaches the log.
    pub fn public_message(&self) -> String {
        match self {
            Error::Connectivity => self.to_string(),
            e if e.status_code().is_server_error() => {
                tracing::error!("Internal error: {e}");
                "Internal server error".to_string()
            }
            e => e.to_string(),
        }
    }

    /// Convert error into HTTP response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.public_message()
        });

        let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
        *response.status_mut() = status;
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}

/// Result type alias using secretaria's Error.
pub type Result<T> = std::result::Result<T, Error>;
