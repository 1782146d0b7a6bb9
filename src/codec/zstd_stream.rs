//! Zstd adapter using the streaming `Encoder`/`Decoder` objects.

use std::io::{self, Read, Write};
use std::ops::RangeInclusive;

use crate::codec::Codec;
use crate::error::{HarnessError, Result};

pub struct ZstdStream;

impl Codec for ZstdStream {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn extension(&self) -> &'static str {
        "zst"
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        1..=22
    }

    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()> {
        self.validate_level(level)?;
        let mut encoder = zstd::stream::Encoder::new(output, level)
            .map_err(|e| HarnessError::io("zstd encoder init", e))?;
        io::copy(input, &mut encoder).map_err(|e| HarnessError::io("zstd compress", e))?;
        encoder
            .finish()
            .map_err(|e| HarnessError::io("zstd finish", e))?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let corrupt = |e: io::Error| HarnessError::CorruptArtifact {
            codec: self.name(),
            source: e,
        };
        let mut decoder = zstd::stream::Decoder::new(input).map_err(corrupt)?;
        io::copy(&mut decoder, output).map_err(corrupt)?;
        Ok(())
    }
}
