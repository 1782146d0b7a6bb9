pub mod brotli;
pub mod gzip;
pub mod lz4;
pub mod xz;
pub mod zstd_pipe;
pub mod zstd_stream;

use std::io::{Read, Write};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Identifies one backend/level combination in the benchmark matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSpec {
    pub codec: String,
    pub level: i32,
}

impl CodecSpec {
    pub fn new(codec: impl Into<String>, level: i32) -> Self {
        CodecSpec {
            codec: codec.into(),
            level,
        }
    }
}

impl std::fmt::Display for CodecSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} level {}", self.codec, self.level)
    }
}

/// Uniform wrapper around one compression backend.
///
/// Each call is independent; adapters hold no state between invocations.
/// Both transforms are blocking pipes from `input` to `output`.
pub trait Codec {
    /// Backend name as it appears in the matrix and the report.
    fn name(&self) -> &'static str;

    /// Artifact filename suffix, e.g. `gz` for `case.tar.gz`.
    fn extension(&self) -> &'static str;

    /// Levels this backend accepts.
    fn level_range(&self) -> RangeInclusive<i32>;

    /// Rejects out-of-range levels before any I/O is attempted.
    fn validate_level(&self, level: i32) -> Result<()> {
        let range = self.level_range();
        if range.contains(&level) {
            Ok(())
        } else {
            Err(HarnessError::InvalidLevel {
                codec: self.name(),
                level,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }

    /// Compresses `input` into `output` at the given level.
    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()>;

    /// Decompresses `input` into `output`, failing with `CorruptArtifact`
    /// if the stream is not validly formatted for this backend.
    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()>;
}

/// Looks up an adapter by matrix name.
pub fn resolve(name: &str) -> Option<Box<dyn Codec>> {
    match name {
        "gzip" => Some(Box::new(gzip::Gzip)),
        "brotli" => Some(Box::new(brotli::Brotli)),
        "zstd" => Some(Box::new(zstd_stream::ZstdStream)),
        "zstd-pipe" => Some(Box::new(zstd_pipe::ZstdPipe)),
        "xz" => Some(Box::new(xz::Xz)),
        "lz4" => Some(Box::new(lz4::Lz4)),
        _ => None,
    }
}

/// All backends under comparison, in report order.
pub fn all() -> Vec<Box<dyn Codec>> {
    vec![
        Box::new(gzip::Gzip),
        Box::new(brotli::Brotli),
        Box::new(zstd_stream::ZstdStream),
        Box::new(zstd_pipe::ZstdPipe),
        Box::new(xz::Xz),
        Box::new(lz4::Lz4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that panics on first use, proving validation happens before I/O.
    struct PanicReader;

    impl Read for PanicReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("stream was read before level validation");
        }
    }

    #[test]
    fn resolve_knows_every_backend() {
        for codec in all() {
            let resolved = resolve(codec.name()).unwrap();
            assert_eq!(resolved.name(), codec.name());
        }
        assert!(resolve("bzip2").is_none());
    }

    #[test]
    fn out_of_range_levels_fail_before_any_io() {
        let cases = [("gzip", 15), ("brotli", 99), ("zstd", 23), ("lz4", -1)];
        for (name, level) in cases {
            let codec = resolve(name).unwrap();
            let err = codec
                .compress(&mut PanicReader, &mut Vec::new(), level)
                .unwrap_err();
            assert!(
                matches!(err, HarnessError::InvalidLevel { .. }),
                "{name} level {level}: {err}"
            );
        }
    }

    #[test]
    fn roundtrip_all_backends_at_range_edges() {
        let payload = b"the quick brown fox jumps over the lazy dog".repeat(100);
        for codec in all() {
            for level in [*codec.level_range().start(), *codec.level_range().end()] {
                let mut compressed = Vec::new();
                codec
                    .compress(&mut &payload[..], &mut compressed, level)
                    .unwrap();
                assert!(!compressed.is_empty());

                let mut restored = Vec::new();
                codec
                    .decompress(&mut &compressed[..], &mut restored)
                    .unwrap();
                assert_eq!(restored, payload, "{} level {level}", codec.name());
            }
        }
    }

    #[test]
    fn roundtrip_empty_and_single_byte_inputs() {
        for codec in all() {
            for payload in [&b""[..], &b"x"[..]] {
                let level = *codec.level_range().start();
                let mut compressed = Vec::new();
                codec
                    .compress(&mut &payload[..], &mut compressed, level)
                    .unwrap();

                let mut restored = Vec::new();
                codec
                    .decompress(&mut &compressed[..], &mut restored)
                    .unwrap();
                assert_eq!(restored, payload, "{}", codec.name());
            }
        }
    }

    #[test]
    fn garbage_input_is_a_corrupt_artifact() {
        let garbage = [0xde, 0xad, 0xbe, 0xef, 0x00, 0x11, 0x22, 0x33];
        for codec in all() {
            let err = codec
                .decompress(&mut &garbage[..], &mut Vec::new())
                .unwrap_err();
            assert!(
                matches!(err, HarnessError::CorruptArtifact { .. }),
                "{}: {err}",
                codec.name()
            );
        }
    }

    #[test]
    fn truncated_artifact_is_a_corrupt_artifact() {
        let payload = b"some moderately compressible payload ".repeat(64);
        for codec in all() {
            let mut compressed = Vec::new();
            codec
                .compress(&mut &payload[..], &mut compressed, *codec.level_range().start())
                .unwrap();
            compressed.truncate(compressed.len() / 2);

            let err = codec
                .decompress(&mut &compressed[..], &mut Vec::new())
                .unwrap_err();
            assert!(
                matches!(err, HarnessError::CorruptArtifact { .. }),
                "{}: {err}",
                codec.name()
            );
        }
    }
}
