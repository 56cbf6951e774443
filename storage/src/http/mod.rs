use std::fmt::Display;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Response;
use serde::{de, Deserialize};

pub mod error;
pub mod objects;
pub mod storage_client;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The service answered with an error document.
    #[error(transparent)]
    Response(#[from] error::ErrorResponse),

    /// Transport failure, or an error status whose body could not be parsed.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    HttpMiddleware(anyhow::Error),

    #[error("token source failed: {0}")]
    TokenSource(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// `true` for a 404, whether or not the body carried an error document.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// HTTP status of the failed request, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response(e) => Some(e.code),
            Error::HttpClient(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Reqwest(err) => Error::HttpClient(err),
            reqwest_middleware::Error::Middleware(err) => Error::HttpMiddleware(err),
        }
    }
}

/// Passes successful responses through and turns the rest into [`Error`].
pub(crate) async fn check_response_status(response: Response) -> Result<Response, Error> {
    let status_error = match response.error_for_status_ref() {
        Ok(_) => return Ok(response),
        Err(e) => e,
    };
    match response.json::<error::ErrorWrapper>().await {
        Ok(wrapper) => Err(Error::Response(wrapper.error)),
        Err(_) => Err(Error::HttpClient(status_error)),
    }
}

pub(crate) trait Escape {
    fn escape(&self) -> String;
}

impl Escape for String {
    fn escape(&self) -> String {
        utf8_percent_encode(self, OBJECT_NAME).to_string()
    }
}

/// Object names may contain `/`, which must be encoded inside a path segment.
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'*').remove(b'-').remove(b'.').remove(b'_');

/// Deserializes a number the JSON API sends as a string.
pub(crate) fn from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: Display,
    D: de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(de::Error::custom)
}

pub(crate) fn is_i64_zero(num: &i64) -> bool {
    *num == 0
}
