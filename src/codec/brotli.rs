//! Brotli adapter.

use std::io::{self, Read, Write};
use std::ops::RangeInclusive;

use crate::codec::Codec;
use crate::error::{HarnessError, Result};

const BUFFER_SIZE: usize = 4096;
const LG_WINDOW_SIZE: u32 = 22;

pub struct Brotli;

impl Codec for Brotli {
    fn name(&self) -> &'static str {
        "brotli"
    }

    fn extension(&self) -> &'static str {
        "br"
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        0..=11
    }

    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()> {
        self.validate_level(level)?;
        {
            // The encoder emits its end-of-stream marker on drop.
            let mut encoder = brotli::CompressorWriter::new(
                &mut *output,
                BUFFER_SIZE,
                level as u32,
                LG_WINDOW_SIZE,
            );
            io::copy(input, &mut encoder).map_err(|e| HarnessError::io("brotli compress", e))?;
        }
        output
            .flush()
            .map_err(|e| HarnessError::io("brotli finish", e))?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let mut decoder = brotli::Decompressor::new(input, BUFFER_SIZE);
        io::copy(&mut decoder, output).map_err(|e| HarnessError::CorruptArtifact {
            codec: self.name(),
            source: e,
        })?;
        Ok(())
    }
}
