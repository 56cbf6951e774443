use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, TryStream, TryStreamExt};
use reqwest::Body;
use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use token_source::TokenSource;

use crate::http::objects::delete::DeleteObjectRequest;
use crate::http::objects::download::Range;
use crate::http::objects::get::GetObjectRequest;
use crate::http::objects::upload::{Media, UploadObjectRequest};
use crate::http::objects::Object;
use crate::http::{check_response_status, objects, Error};

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/devstorage.full_control",
];

#[derive(Clone)]
pub struct StorageClient {
    ts: Option<Arc<dyn TokenSource>>,
    v1_endpoint: String,
    v1_upload_endpoint: String,
    http: Client,
}

impl StorageClient {
    pub(crate) fn new(ts: Option<Arc<dyn TokenSource>>, endpoint: &str, http: Client) -> Self {
        Self {
            ts,
            v1_endpoint: format!("{endpoint}/storage/v1"),
            v1_upload_endpoint: format!("{endpoint}/upload/storage/v1"),
            http,
        }
    }

    /// Gets the object metadata.
    ///
    /// ```
    /// use gcloud_storage_object::client::Client;
    /// use gcloud_storage_object::http::objects::get::GetObjectRequest;
    ///
    /// async fn run(client: Client) {
    ///     let result = client.get_object(&GetObjectRequest{
    ///         bucket: "bucket".to_string(),
    ///         object: "object".to_string(),
    ///         ..Default::default()
    ///     }).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_object(&self, req: &GetObjectRequest) -> Result<Object, Error> {
        let builder = objects::get::build(self.v1_endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Deletes the object.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete_object(&self, req: &DeleteObjectRequest) -> Result<(), Error> {
        let builder = objects::delete::build(self.v1_endpoint.as_str(), &self.http, req);
        self.send_get_empty(builder).await
    }

    /// Downloads the object data, or the given part of it.
    ///
    /// ```
    /// use gcloud_storage_object::client::Client;
    /// use gcloud_storage_object::http::objects::get::GetObjectRequest;
    /// use gcloud_storage_object::http::objects::download::Range;
    ///
    /// async fn run(client: Client) {
    ///     let result = client.download_object(&GetObjectRequest{
    ///         bucket: "bucket".to_string(),
    ///         object: "object".to_string(),
    ///         ..Default::default()
    ///     }, &Range(Some(0), Some(1023))).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn download_object(&self, req: &GetObjectRequest, range: &Range) -> Result<Vec<u8>, Error> {
        let builder = objects::download::build(self.v1_endpoint.as_str(), &self.http, req, range);
        let request = self.with_headers(builder).await?;
        let response = request.send().await?;
        let response = check_response_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Downloads the object data as a stream of chunks.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn download_streamed_object(
        &self,
        req: &GetObjectRequest,
        range: &Range,
    ) -> Result<impl Stream<Item = Result<Bytes, Error>>, Error> {
        let builder = objects::download::build(self.v1_endpoint.as_str(), &self.http, req, range);
        let request = self.with_headers(builder).await?;
        let response = request.send().await?;
        let response = check_response_status(response).await?;
        Ok(response.bytes_stream().map_err(Error::from))
    }

    /// Uploads the object with a simple media upload.
    ///
    /// ```
    /// use gcloud_storage_object::client::Client;
    /// use gcloud_storage_object::http::objects::upload::{Media, UploadObjectRequest};
    ///
    /// async fn run(client: Client) {
    ///     let media = Media::new("file.png").with_content_type("image/png");
    ///     let result = client.upload_object(&UploadObjectRequest{
    ///         bucket: "bucket".to_string(),
    ///         ..Default::default()
    ///     }, "hello world".as_bytes(), &media).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn upload_object<T: Into<Body>>(
        &self,
        req: &UploadObjectRequest,
        data: T,
        media: &Media,
    ) -> Result<Object, Error> {
        let builder = objects::upload::build(self.v1_upload_endpoint.as_str(), &self.http, req, media, data);
        self.send(builder).await
    }

    /// Uploads the object from a stream of chunks.
    /// The service requires `Content-Length` for this request, so `media.content_length` should be set.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn upload_streamed_object<S>(
        &self,
        req: &UploadObjectRequest,
        data: S,
        media: &Media,
    ) -> Result<Object, Error>
    where
        S: TryStream + Send + Sync + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        Bytes: From<S::Ok>,
    {
        self.upload_object(req, Body::wrap_stream(data), media).await
    }

    async fn with_headers(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        let builder = builder
            .header("X-Goog-Api-Client", "rust")
            .header(reqwest::header::USER_AGENT, "gcloud-storage-object");
        match &self.ts {
            Some(ts) => {
                let token = ts.token().await.map_err(Error::TokenSource)?;
                Ok(builder.header(reqwest::header::AUTHORIZATION, token))
            }
            None => Ok(builder),
        }
    }

    async fn send<T>(&self, builder: RequestBuilder) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = self.with_headers(builder).await?;
        let response = request.send().await?;
        let response = check_response_status(response).await?;
        Ok(response.json().await?)
    }

    async fn send_get_empty(&self, builder: RequestBuilder) -> Result<(), Error> {
        let builder = self.with_headers(builder).await?;
        let response = builder.send().await?;
        check_response_status(response).await?;
        Ok(())
    }
}
