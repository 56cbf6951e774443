use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::null_stream::NullStream;
use crate::progress::{rate, report_progress, ProgressMonitor, Throughput};
use crate::random_stream::LongRandomStream;
use crate::transport::ObjectTransport;
use crate::Error;

pub const DEFAULT_OBJECT: &str = "5gb.dat";
pub const DEFAULT_OBJECT_SIZE: u64 = 5 * 1024 * 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    /// Must exist beforehand.
    pub bucket: String,
    pub object: String,
    /// Size of the object created when it does not exist yet.
    pub object_size: u64,
    /// Size of each ranged download request.
    pub chunk_size: u64,
    /// Full downloads per worker.
    pub iterations: usize,
    pub workers: usize,
    pub report_interval: Duration,
}

impl BenchmarkConfig {
    pub fn new(bucket: impl Into<String>, iterations: usize, workers: usize) -> Self {
        Self {
            bucket: bucket.into(),
            object: DEFAULT_OBJECT.to_string(),
            object_size: DEFAULT_OBJECT_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            iterations,
            workers,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkSummary {
    /// Size of the object that was downloaded.
    pub object_size: u64,
    /// Bytes counted by the progress monitors of all workers.
    pub total_bytes: u64,
    /// Bytes received by each worker's sink.
    pub worker_bytes: Vec<u64>,
    pub elapsed: Duration,
    pub samples: Vec<Throughput>,
}

impl BenchmarkSummary {
    pub fn mbps(&self) -> f64 {
        rate(self.total_bytes, self.elapsed)
    }
}

/// Download throughput benchmark: `workers` concurrent workers each download the whole object
/// `iterations` times while a reporter prints the aggregate rate.
pub struct Benchmark<T> {
    transport: Arc<T>,
    config: BenchmarkConfig,
}

impl<T: ObjectTransport> Benchmark<T> {
    pub fn new(transport: T, config: BenchmarkConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Uploads random content of the configured size unless the object exists.
    /// Returns the size of the object.
    pub async fn create_object_if_necessary(&self) -> Result<u64, Error> {
        let BenchmarkConfig { bucket, object, .. } = &self.config;
        if let Some(size) = self.transport.object_size(bucket, object).await? {
            tracing::info!("File {bucket}/{object} already exists. Skipping upload.");
            return Ok(size);
        }
        tracing::info!("File {bucket}/{object} not found. Creating.");
        let size = self.config.object_size;
        let started = Instant::now();
        self.transport
            .upload(bucket, object, LongRandomStream::new(size))
            .await?;
        tracing::info!("{size} bytes uploaded in {}ms", started.elapsed().as_millis());
        Ok(size)
    }

    pub async fn run(&self) -> Result<BenchmarkSummary, Error> {
        let object_size = self.create_object_if_necessary().await?;

        let total = Arc::new(AtomicU64::new(0));
        let done = Arc::new(AtomicBool::new(false));
        let started = Instant::now();
        let reporter = tokio::spawn(report_progress(
            total.clone(),
            done.clone(),
            self.config.report_interval,
            started,
        ));

        let mut workers = JoinSet::new();
        for _ in 0..self.config.workers {
            workers.spawn(download(
                self.transport.clone(),
                self.config.clone(),
                object_size,
                total.clone(),
            ));
        }
        let mut worker_bytes = Vec::with_capacity(self.config.workers);
        let mut failure = None;
        while let Some(result) = workers.join_next().await {
            match result.map_err(Error::from).and_then(|r| r) {
                Ok(bytes) => worker_bytes.push(bytes),
                Err(e) => {
                    tracing::error!("download worker failed: {e}");
                    failure.get_or_insert(e);
                }
            }
        }
        let elapsed = started.elapsed();
        done.store(true, Ordering::Release);
        let samples = reporter.await?;
        if let Some(e) = failure {
            return Err(e);
        }

        let summary = BenchmarkSummary {
            object_size,
            total_bytes: total.load(Ordering::Acquire),
            worker_bytes,
            elapsed,
            samples,
        };
        tracing::info!(
            "{} bytes downloaded by {} workers in {}ms ({:.2}MBps)",
            summary.total_bytes,
            self.config.workers,
            elapsed.as_millis(),
            summary.mbps()
        );
        Ok(summary)
    }
}

/// One worker: `iterations` full downloads into its own sink, `chunk_size` bytes per request.
async fn download<T: ObjectTransport>(
    transport: Arc<T>,
    config: BenchmarkConfig,
    object_size: u64,
    total: Arc<AtomicU64>,
) -> Result<u64, Error> {
    let sink = NullStream::new();
    let chunk_size = config.chunk_size.max(1);
    for _ in 0..config.iterations {
        let mut monitor = ProgressMonitor::new(total.clone());
        let mut downloaded = 0;
        while downloaded < object_size {
            let end = downloaded.saturating_add(chunk_size).min(object_size) - 1;
            let n = transport
                .download_range(&config.bucket, &config.object, downloaded, end, &sink)
                .await?;
            if n == 0 {
                return Err(Error::UnexpectedEof {
                    object: config.object.clone(),
                    offset: downloaded,
                    size: object_size,
                });
            }
            downloaded += n;
            monitor.report(downloaded);
        }
    }
    Ok(sink.len())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serial_test::serial;

    use crate::benchmark::{download, Benchmark, BenchmarkConfig};
    use crate::null_stream::NullStream;
    use crate::random_stream::LongRandomStream;
    use crate::transport::ObjectTransport;
    use crate::Error;

    #[ctor::ctor]
    fn init() {
        let filter = tracing_subscriber::filter::EnvFilter::from_default_env()
            .add_directive("gcloud_storage_perf=trace".parse().unwrap());
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    #[derive(Default)]
    struct MemoryTransport {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        uploads: AtomicUsize,
        requests: AtomicUsize,
        forbidden: bool,
        /// Caps the bytes returned per range request, like a server answering with a short body.
        max_response: Option<u64>,
    }

    impl MemoryTransport {
        fn with_object(name: &str, size: usize) -> Self {
            let transport = Self::default();
            transport.objects.lock().unwrap().insert(name.to_string(), vec![1u8; size]);
            transport
        }
    }

    #[async_trait::async_trait]
    impl ObjectTransport for MemoryTransport {
        async fn object_size(&self, _bucket: &str, object: &str) -> Result<Option<u64>, Error> {
            if self.forbidden {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "forbidden").into());
            }
            Ok(self.objects.lock().unwrap().get(object).map(|o| o.len() as u64))
        }

        async fn upload(&self, _bucket: &str, object: &str, mut source: LongRandomStream) -> Result<(), Error> {
            let mut data = Vec::new();
            source.read_to_end(&mut data)?;
            self.uploads.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().insert(object.to_string(), data);
            Ok(())
        }

        async fn download_range(
            &self,
            _bucket: &str,
            object: &str,
            start: u64,
            end: u64,
            sink: &NullStream,
        ) -> Result<u64, Error> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let end = match self.max_response {
                Some(0) => return Ok(0),
                Some(max) => end.min(start + max - 1),
                None => end,
            };
            let objects = self.objects.lock().unwrap();
            let data = &objects[object];
            let end = (end as usize).min(data.len() - 1);
            let mut writer = sink;
            writer.write_all(&data[start as usize..=end])?;
            Ok((end + 1 - start as usize) as u64)
        }
    }

    fn config(iterations: usize, workers: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            object: "bench.dat".to_string(),
            object_size: 10_000,
            chunk_size: 1024,
            report_interval: Duration::from_millis(5),
            ..BenchmarkConfig::new("bucket", iterations, workers)
        }
    }

    #[test]
    fn test_default_config() {
        let config = BenchmarkConfig::new("bucket", 2, 4);
        assert_eq!(config.object, "5gb.dat");
        assert_eq!(config.object_size, 5 * 1024 * 1024 * 1024);
        assert_eq!(config.chunk_size, 1024 * 1024);
        assert_eq!(config.report_interval, Duration::from_secs(1));
    }

    #[tokio::test]
    #[serial]
    async fn test_create_object_if_necessary_uploads_missing_object() {
        let benchmark = Benchmark::new(MemoryTransport::default(), config(1, 1));
        assert_eq!(benchmark.create_object_if_necessary().await.unwrap(), 10_000);
        assert_eq!(benchmark.create_object_if_necessary().await.unwrap(), 10_000);
        assert_eq!(benchmark.transport.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(benchmark.transport.objects.lock().unwrap()["bench.dat"].len(), 10_000);
    }

    #[tokio::test]
    #[serial]
    async fn test_create_object_if_necessary_propagates_other_errors() {
        let transport = MemoryTransport {
            forbidden: true,
            ..Default::default()
        };
        let benchmark = Benchmark::new(transport, config(1, 1));
        let err = benchmark.create_object_if_necessary().await.unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied));
        assert_eq!(benchmark.transport.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 3)]
    #[serial]
    async fn test_run_counts_every_byte() {
        let benchmark = Benchmark::new(MemoryTransport::default(), config(2, 3));
        let summary = benchmark.run().await.unwrap();
        assert_eq!(summary.object_size, 10_000);
        assert_eq!(summary.total_bytes, 2 * 3 * 10_000);
        assert_eq!(summary.worker_bytes, vec![20_000; 3]);
        // 10 requests of 1024 bytes per download
        assert_eq!(benchmark.transport.requests.load(Ordering::SeqCst), 2 * 3 * 10);
        assert!(summary.samples.iter().all(|s| s.bytes <= summary.total_bytes));
    }

    #[tokio::test]
    #[serial]
    async fn test_run_uses_existing_object_size() {
        let transport = MemoryTransport::with_object("bench.dat", 2048);
        let benchmark = Benchmark::new(transport, config(1, 2));
        let summary = benchmark.run().await.unwrap();
        assert_eq!(summary.object_size, 2048);
        assert_eq!(summary.total_bytes, 4096);
        assert_eq!(benchmark.transport.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    #[serial]
    async fn test_run_with_empty_object() {
        let transport = MemoryTransport::with_object("bench.dat", 0);
        let benchmark = Benchmark::new(transport, config(3, 2));
        let summary = benchmark.run().await.unwrap();
        assert_eq!(summary.total_bytes, 0);
        assert_eq!(benchmark.transport.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_responses_with_huge_chunk_size() {
        let transport = MemoryTransport {
            max_response: Some(100),
            ..MemoryTransport::with_object("bench.dat", 1000)
        };
        let config = BenchmarkConfig {
            chunk_size: u64::MAX,
            ..config(1, 1)
        };
        let total = Arc::new(AtomicU64::new(0));
        let transport = Arc::new(transport);
        let written = download(transport.clone(), config, 1000, total.clone()).await.unwrap();
        assert_eq!(written, 1000);
        assert_eq!(total.load(Ordering::SeqCst), 1000);
        assert_eq!(transport.requests.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_range_response_is_unexpected_eof() {
        let transport = MemoryTransport {
            max_response: Some(0),
            ..MemoryTransport::with_object("bench.dat", 2048)
        };
        let benchmark = Benchmark::new(transport, config(1, 2));
        let err = benchmark.run().await.unwrap_err();
        match err {
            Error::UnexpectedEof { object, offset, size } => {
                assert_eq!(object, "bench.dat");
                assert_eq!(offset, 0);
                assert_eq!(size, 2048);
            }
            e => panic!("unexpected error {e:?}"),
        }
    }
}
