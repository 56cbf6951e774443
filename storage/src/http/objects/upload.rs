use std::borrow::Cow;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Body;
use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::Escape;

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadObjectRequest {
    /// Bucket the object is written to; must exist.
    #[serde(skip_serializing)]
    pub bucket: String,
    /// `Some(0)` makes the upload fail when the object already exists.
    pub if_generation_match: Option<i64>,
    pub if_generation_not_match: Option<i64>,
    pub if_metageneration_match: Option<i64>,
    pub if_metageneration_not_match: Option<i64>,
    /// Stored as the object's `contentEncoding`, e.g. `gzip`.
    pub content_encoding: Option<String>,
    /// Cloud KMS key for the object instead of the bucket default.
    pub kms_key_name: Option<String>,
}

/// Name and media type of the object written by a simple upload.
#[derive(Clone, Debug)]
pub struct Media {
    pub name: Cow<'static, str>,
    pub content_type: Cow<'static, str>,
    /// Sent as `Content-Length`; required by the service for streamed bodies.
    pub content_length: Option<u64>,
}

impl Media {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            content_type: "application/octet-stream".into(),
            content_length: None,
        }
    }

    pub fn with_content_type(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.content_type = value.into();
        self
    }

    pub fn with_content_length(mut self, value: u64) -> Self {
        self.content_length = Some(value);
        self
    }
}

pub(crate) fn build<T: Into<Body>>(
    base_url: &str,
    client: &Client,
    req: &UploadObjectRequest,
    media: &Media,
    body: T,
) -> RequestBuilder {
    let url = format!("{}/b/{}/o?uploadType=media", base_url, req.bucket.escape());
    let mut builder = client
        .post(url)
        .query(&req)
        .query(&[("name", media.name.as_ref())])
        .body(body)
        .header(CONTENT_TYPE, media.content_type.to_string());
    if let Some(len) = media.content_length {
        builder = builder.header(CONTENT_LENGTH, len.to_string())
    }
    builder
}
