//! Gzip adapter over flate2.

use std::io::{self, Read, Write};
use std::ops::RangeInclusive;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::codec::Codec;
use crate::error::{HarnessError, Result};

pub struct Gzip;

impl Codec for Gzip {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn extension(&self) -> &'static str {
        "gz"
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        1..=9
    }

    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()> {
        self.validate_level(level)?;
        let mut encoder = GzEncoder::new(output, Compression::new(level as u32));
        io::copy(input, &mut encoder).map_err(|e| HarnessError::io("gzip compress", e))?;
        encoder
            .finish()
            .map_err(|e| HarnessError::io("gzip finish", e))?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let mut decoder = GzDecoder::new(input);
        io::copy(&mut decoder, output).map_err(|e| HarnessError::CorruptArtifact {
            codec: self.name(),
            source: e,
        })?;
        Ok(())
    }
}
