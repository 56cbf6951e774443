use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error returned from the BigQuery service.
    #[error(transparent)]
    Response(#[from] ErrorResponse),

    /// An error from the HTTP client.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    /// An error from one of the middleware used.
    #[error(transparent)]
    HttpMiddleware(anyhow::Error),

    /// The response body did not match the expected resource.
    #[error(transparent)]
    Deserialize(#[from] serde_json::Error),

    /// An error from a token source.
    #[error("token source failed: {0}")]
    TokenSource(Box<dyn std::error::Error + Send + Sync>),

    /// The request was rejected before it was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` when the resource addressed by the request does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Response(e) => e.code == 404,
            Error::HttpClient(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` when an `If-Match` precondition failed, typically because the etag is stale.
    pub fn is_precondition_failed(&self) -> bool {
        match self {
            Error::Response(e) => e.code == 412,
            Error::HttpClient(e) => e.status() == Some(reqwest::StatusCode::PRECONDITION_FAILED),
            _ => false,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Middleware(err) => Error::HttpMiddleware(err),
            reqwest_middleware::Error::Reqwest(err) => Error::HttpClient(err),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status, e.g. `409` when a dataset already exists.
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorResponseItem>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseItem {
    #[serde(default)]
    pub domain: String,
    /// `notFound`, `duplicate`, `accessDenied` ...
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// Error documents are wrapped as `{"error": {...}}`.
#[derive(serde::Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorResponse,
}
