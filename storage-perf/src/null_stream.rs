use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// A sink that discards everything written to it and only counts the bytes.
///
/// Writable through `&NullStream`, so one sink can be shared between writers.
#[derive(Debug, Default)]
pub struct NullStream {
    length: AtomicU64,
}

impl NullStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of bytes written so far.
    pub fn len(&self) -> u64 {
        self.length.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Write for &NullStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.length.fetch_add(buf.len() as u64, Ordering::AcqRel);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for NullStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for NullStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "NullStream is write-only"))
    }
}

impl Seek for NullStream {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "NullStream is not seekable"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
    use std::sync::Arc;

    use crate::null_stream::NullStream;

    #[test]
    fn test_write_increases_length_by_written_count() {
        let mut sink = NullStream::new();
        assert!(sink.is_empty());
        assert_eq!(sink.write(&[1u8; 100]).unwrap(), 100);
        assert_eq!(sink.len(), 100);
        sink.write_all(&[0u8; 4096]).unwrap();
        assert_eq!(sink.len(), 4196);
        assert_eq!(sink.write(&[]).unwrap(), 0);
        sink.flush().unwrap();
        assert_eq!(sink.len(), 4196);
    }

    #[test]
    fn test_read_and_seek_are_unsupported() {
        let mut sink = NullStream::new();
        assert_eq!(sink.read(&mut [0u8; 4]).unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(sink.seek(SeekFrom::End(0)).unwrap_err().kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_shared_writers() {
        let sink = Arc::new(NullStream::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    let mut writer = &*sink;
                    for _ in 0..1000 {
                        writer.write_all(&[0u8; 10]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.len(), 40_000);
    }
}
