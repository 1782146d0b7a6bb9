//! Stream plumbing shared by sample packing and trial execution.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag for a benchmark run.
///
/// Cloning shares the flag. Once fired it never resets; an in-flight trial
/// observes it at the next stream read and aborts without producing a record.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reader adapter that fails with `ErrorKind::Other` once its token fires.
///
/// `io::copy` retries `Interrupted`, so cancellation must surface as a
/// non-retriable kind to actually abort the pipe.
pub struct CancelRead<R> {
    inner: R,
    token: CancelToken,
}

impl<R: Read> CancelRead<R> {
    pub fn new(inner: R, token: CancelToken) -> Self {
        CancelRead { inner, token }
    }
}

impl<R: Read> Read for CancelRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.token.is_cancelled() {
            return Err(io::Error::new(io::ErrorKind::Other, "run cancelled"));
        }
        self.inner.read(buf)
    }
}

/// Writer adapter that counts bytes written through it.
///
/// Wraps the artifact writer and the trial's null sink so the harness knows
/// packed and decompressed lengths without retaining any data.
pub struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        CountingWriter { inner, count: 0 }
    }

    pub fn bytes_written(&self) -> u64 {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_writer_tracks_bytes() {
        let mut writer = CountingWriter::new(Vec::new());
        writer.write_all(b"hello").unwrap();
        writer.write_all(b" world").unwrap();
        assert_eq!(writer.bytes_written(), 11);
        assert_eq!(writer.into_inner(), b"hello world");
    }

    #[test]
    fn counting_writer_to_sink_discards() {
        let mut writer = CountingWriter::new(io::sink());
        writer.write_all(&[0u8; 4096]).unwrap();
        assert_eq!(writer.bytes_written(), 4096);
    }

    #[test]
    fn cancel_read_passes_through_until_cancelled() {
        let token = CancelToken::new();
        let mut reader = CancelRead::new(&b"abc"[..], token.clone());
        let mut buf = [0u8; 2];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);

        token.cancel();
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
