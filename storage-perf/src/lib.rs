//! # gcloud-storage-perf
//!
//! Measures how fast Cloud Storage objects can be downloaded.
//!
//! The benchmark makes sure a large object exists in the bucket (uploading random content when it
//! does not), then downloads it repeatedly from several concurrent workers in ranged chunks while
//! the aggregate throughput is printed once per second.
//!
//! ```
//! use gcloud_storage_object::client::{Client, ClientConfig};
//! use gcloud_storage_perf::benchmark::{Benchmark, BenchmarkConfig};
//!
//! async fn run() {
//!     let client = Client::new(ClientConfig::default().with_auth().await.unwrap());
//!     let summary = Benchmark::new(client, BenchmarkConfig::new("bucket", 2, 8)).run().await.unwrap();
//!     println!("{:.2}MBps", summary.mbps());
//! }
//! ```

pub mod benchmark;
mod error;
pub mod null_stream;
pub mod progress;
pub mod random_stream;
pub mod transport;

pub use error::Error;
