//! Zstd adapter using the one-shot `copy_encode`/`copy_decode` path.
//!
//! Same libzstd as the `zstd` backend, different wrapper plumbing; keeping
//! both in the matrix shows what the binding layer itself costs.

use std::io::{Read, Write};
use std::ops::RangeInclusive;

use crate::codec::Codec;
use crate::error::{HarnessError, Result};

pub struct ZstdPipe;

impl Codec for ZstdPipe {
    fn name(&self) -> &'static str {
        "zstd-pipe"
    }

    fn extension(&self) -> &'static str {
        "zst"
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        1..=22
    }

    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()> {
        self.validate_level(level)?;
        zstd::stream::copy_encode(input, output, level)
            .map_err(|e| HarnessError::io("zstd-pipe compress", e))?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        zstd::stream::copy_decode(input, output).map_err(|e| HarnessError::CorruptArtifact {
            codec: self.name(),
            source: e,
        })?;
        Ok(())
    }
}
