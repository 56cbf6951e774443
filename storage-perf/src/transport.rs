use std::io::Write;

use futures_util::StreamExt;

use gcloud_storage_object::client::Client;
use gcloud_storage_object::http::objects::download::Range;
use gcloud_storage_object::http::objects::get::GetObjectRequest;
use gcloud_storage_object::http::objects::upload::{Media, UploadObjectRequest};

use crate::null_stream::NullStream;
use crate::random_stream::LongRandomStream;
use crate::Error;

/// The object operations the benchmark needs.
#[async_trait::async_trait]
pub trait ObjectTransport: Send + Sync + 'static {
    /// Size of the object, or `None` if it does not exist.
    async fn object_size(&self, bucket: &str, object: &str) -> Result<Option<u64>, Error>;

    /// Creates the object from `source` as `application/octet-stream`.
    async fn upload(&self, bucket: &str, object: &str, source: LongRandomStream) -> Result<(), Error>;

    /// Writes bytes `start..=end` of the object to `sink` and returns how many were written.
    async fn download_range(
        &self,
        bucket: &str,
        object: &str,
        start: u64,
        end: u64,
        sink: &NullStream,
    ) -> Result<u64, Error>;
}

#[async_trait::async_trait]
impl ObjectTransport for Client {
    async fn object_size(&self, bucket: &str, object: &str) -> Result<Option<u64>, Error> {
        let req = GetObjectRequest {
            bucket: bucket.to_string(),
            object: object.to_string(),
            ..Default::default()
        };
        match self.get_object(&req).await {
            Ok(object) => Ok(Some(u64::try_from(object.size).unwrap_or_default())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn upload(&self, bucket: &str, object: &str, source: LongRandomStream) -> Result<(), Error> {
        let req = UploadObjectRequest {
            bucket: bucket.to_string(),
            ..Default::default()
        };
        let media = Media::new(object.to_string()).with_content_length(source.len());
        self.upload_streamed_object(&req, source.into_stream(LongRandomStream::DEFAULT_CHUNK_SIZE), &media)
            .await?;
        Ok(())
    }

    async fn download_range(
        &self,
        bucket: &str,
        object: &str,
        start: u64,
        end: u64,
        sink: &NullStream,
    ) -> Result<u64, Error> {
        let req = GetObjectRequest {
            bucket: bucket.to_string(),
            object: object.to_string(),
            ..Default::default()
        };
        let stream = self.download_streamed_object(&req, &Range(Some(start), Some(end))).await?;
        let mut stream = std::pin::pin!(stream);
        let mut writer = sink;
        let mut written = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }
}
