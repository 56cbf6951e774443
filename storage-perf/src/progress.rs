use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const MIB: f64 = 1024.0 * 1024.0;

/// Adds the growth of a single download to the counter shared by all workers.
#[derive(Debug)]
pub struct ProgressMonitor {
    total: Arc<AtomicU64>,
    last_seen: u64,
}

impl ProgressMonitor {
    pub fn new(total: Arc<AtomicU64>) -> Self {
        Self { total, last_seen: 0 }
    }

    /// `bytes_downloaded` is the running total of the current download.
    pub fn report(&mut self, bytes_downloaded: u64) {
        let delta = bytes_downloaded.saturating_sub(self.last_seen);
        self.total.fetch_add(delta, Ordering::AcqRel);
        self.last_seen = bytes_downloaded;
    }
}

/// One line of throughput output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub bytes: u64,
    pub elapsed: Duration,
    pub interval_bytes: u64,
    pub interval: Duration,
}

impl Throughput {
    /// Average rate since the start, in MiB per second.
    pub fn mbps(&self) -> f64 {
        rate(self.bytes, self.elapsed)
    }

    /// Rate over the last interval only.
    pub fn interval_mbps(&self) -> f64 {
        rate(self.interval_bytes, self.interval)
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}MBps     ({} bytes in {}ms)     last {}ms: {:.2}MBps",
            self.mbps(),
            self.bytes,
            self.elapsed.as_millis(),
            self.interval.as_millis(),
            self.interval_mbps()
        )
    }
}

pub(crate) fn rate(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        0.0
    } else {
        bytes as f64 / MIB / secs
    }
}

/// Prints the shared counter every `interval` until `done` is set, returning every sample printed.
pub(crate) async fn report_progress(
    total: Arc<AtomicU64>,
    done: Arc<AtomicBool>,
    interval: Duration,
    started: Instant,
) -> Vec<Throughput> {
    let mut samples = Vec::new();
    let mut last_bytes = 0;
    let mut last_at = started;
    while !done.load(Ordering::Acquire) {
        tokio::time::sleep(interval).await;
        let now = Instant::now();
        let bytes = total.load(Ordering::Acquire);
        let sample = Throughput {
            bytes,
            elapsed: now - started,
            interval_bytes: bytes - last_bytes,
            interval: now - last_at,
        };
        println!("{sample}");
        samples.push(sample);
        last_bytes = bytes;
        last_at = now;
    }
    samples
}
