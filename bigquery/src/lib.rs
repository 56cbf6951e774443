//! # gcloud-bigquery-dataset
//!
//! Google Cloud Platform BigQuery dataset client library.
//!
//! ## Quick Start
//!
//! ### CreateClient
//!
//! `ClientConfig::new_with_auth()` reads the credentials from the file specified in the environment variable
//! `GOOGLE_APPLICATION_CREDENTIALS`, `GOOGLE_APPLICATION_CREDENTIALS_JSON` or from a metadata server.
//!
//! ```rust
//! use gcloud_bigquery_dataset::client::{ClientConfig, Client};
//!
//! async fn run() {
//!     let config = ClientConfig::new_with_auth().await.unwrap();
//!     let client = Client::new(config);
//! }
//! ```
//!
//! ### Datasets
//!
//! ```rust
//! use gcloud_bigquery_dataset::client::Client;
//! use gcloud_bigquery_dataset::http::dataset::{CreateDatasetOptions, Dataset};
//!
//! async fn run(client: &Client) {
//!     let reference = client.dataset_reference("my_dataset");
//!     let options = CreateDatasetOptions {
//!         location: Some("US".to_string()),
//!         ..Default::default()
//!     };
//!     let mut dataset = client.dataset().get_or_create(&reference, None, Some(&options)).await.unwrap();
//!
//!     // the etag of the fetched resource guards the update
//!     dataset.description = Some("updated".to_string());
//!     let dataset = client.dataset().update(&reference, &dataset, None).await.unwrap();
//!
//!     let mut iter = client.dataset().list(&client.project_reference(), None).unwrap();
//!     while let Some(overview) = iter.next().await.unwrap() {
//!         println!("{}", overview.id);
//!     }
//!     client.dataset().delete(&reference, None).await.unwrap();
//! }
//! ```

pub mod client;
pub mod http;
