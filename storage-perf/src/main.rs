use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;

use gcloud_storage_object::client::{Client, ClientConfig};
use gcloud_storage_perf::benchmark::{
    Benchmark, BenchmarkConfig, BenchmarkSummary, DEFAULT_CHUNK_SIZE, DEFAULT_OBJECT, DEFAULT_OBJECT_SIZE,
};

#[derive(Parser, Debug)]
#[command(name = "gcloud-storage-perf")]
#[command(about = "Cloud Storage download throughput test", long_about = None)]
#[command(after_help = "The bucket must exist beforehand, but files will be generated if necessary.")]
struct Cli {
    bucket: String,
    /// Full downloads per worker
    iterations: usize,
    /// Concurrent download workers, also the number of runtime threads
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    threads: u16,
    #[arg(long, default_value = DEFAULT_OBJECT)]
    object: String,
    /// Size in bytes of the object created when missing
    #[arg(long, default_value_t = DEFAULT_OBJECT_SIZE)]
    object_size: u64,
    /// Bytes per ranged download request
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: u64,
    /// e.g. http://localhost:4443 for an emulator
    #[arg(long)]
    endpoint: Option<String>,
    /// Send requests without credentials
    #[arg(long)]
    anonymous: bool,
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    report_interval_ms: u64,
}

impl Cli {
    fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            object: self.object.clone(),
            object_size: self.object_size,
            chunk_size: self.chunk_size,
            report_interval: Duration::from_millis(self.report_interval_ms),
            ..BenchmarkConfig::new(self.bucket.clone(), self.iterations, usize::from(self.threads))
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(usize::from(cli.threads))
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(summary) => {
            println!(
                "{:.2}MBps     ({} bytes in {}ms)",
                summary.mbps(),
                summary.total_bytes,
                summary.elapsed.as_millis()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<BenchmarkSummary> {
    let mut config = if cli.anonymous {
        ClientConfig::default().anonymous()
    } else {
        ClientConfig::default().with_auth().await?
    };
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    let benchmark = Benchmark::new(Client::new(config), cli.benchmark_config());
    Ok(benchmark.run().await?)
}
