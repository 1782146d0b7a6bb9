//! LZ4 frame adapter.

use std::io::{self, Read, Write};
use std::ops::RangeInclusive;

use lz4::{Decoder, EncoderBuilder};

use crate::codec::Codec;
use crate::error::{HarnessError, Result};

pub struct Lz4;

impl Codec for Lz4 {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn extension(&self) -> &'static str {
        "lz4"
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        // 1..=2 are the fast modes, 3..=12 map to LZ4-HC.
        1..=12
    }

    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()> {
        self.validate_level(level)?;
        let mut encoder = EncoderBuilder::new()
            .level(level as u32)
            .build(output)
            .map_err(|e| HarnessError::io("lz4 encoder init", e))?;
        io::copy(input, &mut encoder).map_err(|e| HarnessError::io("lz4 compress", e))?;
        let (_, result) = encoder.finish();
        result.map_err(|e| HarnessError::io("lz4 finish", e))?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let corrupt = |e: io::Error| HarnessError::CorruptArtifact {
            codec: self.name(),
            source: e,
        };
        let mut decoder = Decoder::new(input).map_err(corrupt)?;
        io::copy(&mut decoder, output).map_err(corrupt)?;
        // The frame reader stops quietly at EOF; finish() is what reports a
        // truncated stream.
        let (_, result) = decoder.finish();
        result.map_err(corrupt)?;
        Ok(())
    }
}
