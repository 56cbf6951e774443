use std::fmt;

/// An error response returned from Google Cloud Storage.
///
/// See [HTTP status and error codes for JSON](https://cloud.google.com/storage/docs/json_api/v1/status-codes).
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status, e.g. `404`.
    pub code: u16,
    #[serde(default)]
    pub errors: Vec<ErrorResponseItem>,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ErrorResponse {}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseItem {
    /// `global`, `push` ...
    #[serde(default)]
    pub domain: String,
    /// `notFound`, `forbidden`, `conditionNotMet` ...
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// The service nests the error in an `{"error": ...}` object.
#[derive(serde::Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorResponse,
}

#[cfg(test)]
mod test {
    use crate::http::error::ErrorWrapper;

    #[test]
    fn test_parse_error_without_items() {
        let wrapper: ErrorWrapper = serde_json::from_str(r#"{"error":{"code":412,"message":"Precondition Failed"}}"#).unwrap();
        assert_eq!(wrapper.error.code, 412);
        assert!(wrapper.error.errors.is_empty());
        assert_eq!(wrapper.error.to_string(), "Precondition Failed (412)");
    }
}
