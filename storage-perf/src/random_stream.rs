use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use futures_util::Stream;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A read-only source of `length` random bytes.
///
/// The content differs on every run, only the length is fixed. Reads through `&LongRandomStream`
/// are serialized by an internal lock so one instance can be shared between readers.
#[derive(Debug)]
pub struct LongRandomStream {
    length: u64,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    position: u64,
    rng: StdRng,
}

impl LongRandomStream {
    pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

    pub fn new(length: u64) -> Self {
        Self {
            length,
            state: Mutex::new(State {
                position: 0,
                rng: StdRng::from_entropy(),
            }),
        }
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of bytes read so far. Never exceeds [`len`](Self::len).
    pub fn position(&self) -> u64 {
        self.lock().position
    }

    /// Turns the remaining bytes into a stream of chunks of at most `chunk_size` bytes,
    /// usable as a streamed request body.
    pub fn into_stream(self, chunk_size: usize) -> impl Stream<Item = io::Result<Bytes>> + Send + Sync + 'static {
        let chunk_size = chunk_size.max(1);
        futures_util::stream::iter(std::iter::from_fn(move || {
            let mut buf = vec![0u8; chunk_size];
            let mut reader = &self;
            match reader.read(&mut buf) {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some(Ok(Bytes::from(buf)))
                }
                Err(e) => Some(Err(e)),
            }
        }))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // the state stays consistent even if a reader panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Read for &LongRandomStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.lock();
        let remaining = self.length - state.position;
        let n = remaining.min(buf.len() as u64) as usize;
        state.rng.fill_bytes(&mut buf[..n]);
        state.position += n as u64;
        Ok(n)
    }
}

impl Read for LongRandomStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&*self).read(buf)
    }
}

impl Write for LongRandomStream {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(unsupported("write"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for LongRandomStream {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(unsupported("seek"))
    }
}

fn unsupported(operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{operation} is not supported by LongRandomStream"),
    )
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
    use std::sync::Arc;

    use futures_util::TryStreamExt;

    use crate::random_stream::LongRandomStream;

    #[test]
    fn test_read_advances_position_by_returned_count() {
        let mut stream = LongRandomStream::new(10_000);
        let mut buf = vec![0u8; 4096];
        assert_eq!(stream.read(&mut buf).unwrap(), 4096);
        assert_eq!(stream.position(), 4096);
        assert_eq!(stream.read(&mut buf).unwrap(), 4096);
        assert_eq!(stream.read(&mut buf).unwrap(), 10_000 - 8192);
        assert_eq!(stream.position(), 10_000);
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
        assert_eq!(stream.position(), 10_000);
    }

    #[test]
    fn test_read_to_end_matches_length() {
        let mut stream = LongRandomStream::new(123_457);
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        assert_eq!(data.len(), 123_457);
        assert!(data.iter().any(|b| *b != 0));
        assert_eq!(stream.position(), stream.len());
    }

    #[test]
    fn test_empty_stream() {
        let mut stream = LongRandomStream::new(0);
        assert!(stream.is_empty());
        assert_eq!(stream.read(&mut [0u8; 16]).unwrap(), 0);
    }

    #[test]
    fn test_write_and_seek_are_unsupported_flush_is_noop() {
        let mut stream = LongRandomStream::new(10);
        assert_eq!(stream.write(b"abc").unwrap_err().kind(), ErrorKind::Unsupported);
        stream.flush().unwrap();
        assert_eq!(stream.seek(SeekFrom::Start(1)).unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_concurrent_reads_never_exceed_length() {
        let stream = Arc::new(LongRandomStream::new(1_000_003));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stream = stream.clone();
                std::thread::spawn(move || {
                    let mut reader = &*stream;
                    let mut buf = vec![0u8; 1000];
                    let mut total = 0u64;
                    loop {
                        let n = reader.read(&mut buf).unwrap();
                        if n == 0 {
                            return total;
                        }
                        total += n as u64;
                    }
                })
            })
            .collect();
        let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1_000_003);
        assert_eq!(stream.position(), 1_000_003);
    }

    #[tokio::test]
    async fn test_into_stream_chunks() {
        let chunks: Vec<_> = LongRandomStream::new(10_000)
            .into_stream(LongRandomStream::DEFAULT_CHUNK_SIZE)
            .try_collect()
            .await
            .unwrap();
        let sizes: Vec<_> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![4096, 4096, 1808]);
    }
}
