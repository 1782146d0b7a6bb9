//! One (codec, level) measurement: pack, compress, persist, decompress, time.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::codec::{self, CodecSpec};
use crate::error::{HarnessError, Result};
use crate::sample::SampleSource;
use crate::stream::{CancelRead, CancelToken, CountingWriter};

const MB: f64 = 1024.0 * 1024.0;

/// One completed measurement. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub codec: String,
    pub level: i32,
    pub total_bytes: u64,
    pub compressed_bytes: u64,
    pub compress_ms: u64,
    pub decompress_ms: u64,
    pub ratio: f64,
    pub compress_mb_per_s: f64,
    pub decompress_mb_per_s: f64,
}

/// Executes trials sequentially against one sample source.
///
/// The artifact path is reused across trials; the sequential protocol
/// guarantees the previous trial's writer is flushed and closed before the
/// next one opens it.
pub struct TrialRunner<'a> {
    sample: &'a SampleSource,
    work_dir: PathBuf,
    cancel: CancelToken,
    packed: Option<Vec<u8>>,
}

impl<'a> TrialRunner<'a> {
    pub fn new(sample: &'a SampleSource, work_dir: impl Into<PathBuf>, cancel: CancelToken) -> Self {
        TrialRunner {
            sample,
            work_dir: work_dir.into(),
            cancel,
            packed: None,
        }
    }

    /// Runs one trial end-to-end and returns its record.
    ///
    /// Any failure comes back tagged with the spec that was running.
    pub fn run(&mut self, spec: &CodecSpec) -> Result<TrialRecord> {
        self.run_inner(spec).map_err(|e| {
            // A fired token makes stream errors indistinguishable from real
            // I/O failures inside the adapters; classify here instead.
            if self.cancel.is_cancelled() {
                HarnessError::Cancelled
            } else {
                e.in_trial(&spec.codec, spec.level)
            }
        })
    }

    fn run_inner(&mut self, spec: &CodecSpec) -> Result<TrialRecord> {
        self.check_cancelled()?;
        let codec = codec::resolve(&spec.codec).ok_or_else(|| HarnessError::io(
            format!("resolve codec {}", spec.codec),
            io::Error::new(io::ErrorKind::NotFound, "unknown codec"),
        ))?;
        codec.validate_level(spec.level)?;

        let packed_len = self.pack_once()? as u64;
        let packed = self.packed.as_deref().unwrap_or_default();
        let total_bytes = self.sample.total_bytes();

        let artifact = self.work_dir.join(format!("case.tar.{}", codec.extension()));
        debug!("{spec}: compressing {packed_len} packed bytes to {}", artifact.display());

        // Compression pass. The writer must be flushed and dropped before the
        // artifact is stat'ed or reopened.
        let compress_start = Instant::now();
        {
            let file = File::create(&artifact)
                .map_err(|e| HarnessError::io(format!("create {}", artifact.display()), e))?;
            let mut writer = BufWriter::new(file);
            let mut reader = CancelRead::new(packed, self.cancel.clone());
            codec.compress(&mut reader, &mut writer, spec.level)?;
            writer
                .flush()
                .map_err(|e| HarnessError::io(format!("flush {}", artifact.display()), e))?;
        }
        let compress_time = compress_start.elapsed();

        let compressed_bytes = std::fs::metadata(&artifact)
            .map_err(|e| HarnessError::io(format!("stat {}", artifact.display()), e))?
            .len();
        if compressed_bytes == 0 {
            return Err(HarnessError::ZeroByteArtifact { path: artifact });
        }

        // Decompression pass, output discarded through a counting null sink.
        let decompress_start = Instant::now();
        let decompressed_bytes = {
            let file = File::open(&artifact)
                .map_err(|e| HarnessError::io(format!("open {}", artifact.display()), e))?;
            let mut reader = CancelRead::new(BufReader::new(file), self.cancel.clone());
            let mut sink = CountingWriter::new(io::sink());
            codec.decompress(&mut reader, &mut sink)?;
            sink.bytes_written()
        };
        let decompress_time = decompress_start.elapsed();

        if decompressed_bytes != packed_len {
            return Err(HarnessError::CorruptArtifact {
                codec: codec.name(),
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("round-trip produced {decompressed_bytes} bytes, packed {packed_len}"),
                ),
            });
        }

        let compress_secs = compress_time.as_secs_f64();
        let decompress_secs = decompress_time.as_secs_f64();
        Ok(TrialRecord {
            codec: spec.codec.clone(),
            level: spec.level,
            total_bytes,
            compressed_bytes,
            compress_ms: compress_time.as_millis() as u64,
            decompress_ms: decompress_time.as_millis() as u64,
            ratio: total_bytes as f64 / compressed_bytes as f64,
            compress_mb_per_s: total_bytes as f64 / MB / compress_secs,
            decompress_mb_per_s: total_bytes as f64 / MB / decompress_secs,
        })
    }

    /// Packs the sample once and reuses the buffer; the source is immutable
    /// for the run, so every trial sees an identical stream.
    fn pack_once(&mut self) -> Result<usize> {
        if self.packed.is_none() {
            let mut buf = Vec::new();
            self.sample.pack(&mut buf)?;
            self.packed = Some(buf);
        }
        Ok(self.packed.as_ref().map(Vec::len).unwrap_or(0))
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(HarnessError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_dir(bytes: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let body: Vec<u8> = (0..bytes).map(|i| (i % 251) as u8).collect();
        fs::write(dir.path().join("case.bin"), body).unwrap();
        fs::write(dir.path().join("notes.txt"), b"sample corpus for timing").unwrap();
        dir
    }

    #[test]
    fn gzip_trial_produces_a_consistent_record() {
        let dir = sample_dir(200_000);
        let work = tempfile::tempdir().unwrap();
        let sample = SampleSource::open(dir.path()).unwrap();
        let mut runner = TrialRunner::new(&sample, work.path(), CancelToken::new());

        let record = runner.run(&CodecSpec::new("gzip", 6)).unwrap();
        assert_eq!(record.codec, "gzip");
        assert_eq!(record.level, 6);
        assert_eq!(record.total_bytes, sample.total_bytes());
        assert!(record.compressed_bytes > 0);
        assert!(record.compressed_bytes < record.total_bytes);
        let expected = record.total_bytes as f64 / record.compressed_bytes as f64;
        assert!((record.ratio - expected).abs() < 1e-9);
        assert!(record.ratio > 0.0);
        assert!(record.compress_mb_per_s > 0.0);
        assert!(record.decompress_mb_per_s > 0.0);

        // The artifact stays on disk, overwritten per run.
        let artifact = work.path().join("case.tar.gz");
        assert_eq!(fs::metadata(artifact).unwrap().len(), record.compressed_bytes);
    }

    #[test]
    fn invalid_level_fails_before_touching_the_work_dir() {
        let dir = sample_dir(1_000);
        let work = tempfile::tempdir().unwrap();
        let sample = SampleSource::open(dir.path()).unwrap();
        let mut runner = TrialRunner::new(&sample, work.path(), CancelToken::new());

        let err = runner.run(&CodecSpec::new("gzip", 15)).unwrap_err();
        match err {
            HarnessError::Trial { codec, level, source } => {
                assert_eq!(codec, "gzip");
                assert_eq!(level, 15);
                assert!(matches!(*source, HarnessError::InvalidLevel { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fs::read_dir(work.path()).unwrap().next().is_none());
    }

    #[test]
    fn unknown_codec_is_a_tagged_failure() {
        let dir = sample_dir(1_000);
        let work = tempfile::tempdir().unwrap();
        let sample = SampleSource::open(dir.path()).unwrap();
        let mut runner = TrialRunner::new(&sample, work.path(), CancelToken::new());

        let err = runner.run(&CodecSpec::new("bzip2", 1)).unwrap_err();
        assert!(matches!(err, HarnessError::Trial { .. }));
    }

    #[test]
    fn cancelled_token_aborts_without_a_record() {
        let dir = sample_dir(50_000);
        let work = tempfile::tempdir().unwrap();
        let sample = SampleSource::open(dir.path()).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let mut runner = TrialRunner::new(&sample, work.path(), token);

        let err = runner.run(&CodecSpec::new("gzip", 6)).unwrap_err();
        assert!(matches!(err, HarnessError::Cancelled));
    }
}
