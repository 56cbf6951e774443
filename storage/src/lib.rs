#![allow(clippy::result_large_err)]
//! # gcloud-storage-object
//!
//! Google Cloud Storage object client library.
//!
//! * [About Cloud Storage](https://cloud.google.com/storage/)
//! * [JSON API Documentation](https://cloud.google.com/storage/docs/json_api/v1)
//!
//! ## Quick Start
//!
//! ### Authentication
//!
//! `with_auth()` reads the credentials from the file specified in the environment variable
//! `GOOGLE_APPLICATION_CREDENTIALS`, `GOOGLE_APPLICATION_CREDENTIALS_JSON` or from a metadata server.
//!
//! ```
//! use gcloud_storage_object::client::{ClientConfig, Client};
//!
//! async fn run() {
//!     let config = ClientConfig::default().with_auth().await.unwrap();
//!     let client = Client::new(config);
//! }
//! ```
//!
//! ### Anonymous Access
//!
//! ```rust
//! use gcloud_storage_object::client::{ClientConfig, Client};
//!
//! async fn run() {
//!     let config = ClientConfig::default().anonymous().with_endpoint("http://localhost:4443");
//!     let client = Client::new(config);
//! }
//! ```
//!
//! ### Usage
//!
//! ```
//! use gcloud_storage_object::client::Client;
//! use gcloud_storage_object::http::objects::download::Range;
//! use gcloud_storage_object::http::objects::get::GetObjectRequest;
//! use gcloud_storage_object::http::objects::upload::{Media, UploadObjectRequest};
//! use gcloud_storage_object::http::objects::delete::DeleteObjectRequest;
//!
//! async fn run(client: Client) {
//!     // Upload the file
//!     let upload_type = Media::new("file.png").with_content_type("image/png");
//!     let uploaded = client.upload_object(&UploadObjectRequest {
//!         bucket: "bucket".to_string(),
//!         ..Default::default()
//!     }, "hello world".as_bytes(), &upload_type).await;
//!
//!     // Download the first kilobyte
//!     let data = client.download_object(&GetObjectRequest {
//!         bucket: "bucket".to_string(),
//!         object: "file.png".to_string(),
//!         ..Default::default()
//!     }, &Range(Some(0), Some(1023))).await;
//!
//!     // Delete the file
//!     let result = client.delete_object(&DeleteObjectRequest {
//!         bucket: "bucket".to_string(),
//!         object: "file.png".to_string(),
//!         ..Default::default()
//!     }).await;
//! }
//! ```

pub mod client;
pub mod http;
