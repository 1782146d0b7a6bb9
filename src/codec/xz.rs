//! Xz adapter over xz2 (liblzma).

use std::io::{self, Read, Write};
use std::ops::RangeInclusive;

use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use crate::codec::Codec;
use crate::error::{HarnessError, Result};

pub struct Xz;

impl Codec for Xz {
    fn name(&self) -> &'static str {
        "xz"
    }

    fn extension(&self) -> &'static str {
        "xz"
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        0..=9
    }

    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write, level: i32) -> Result<()> {
        self.validate_level(level)?;
        let mut encoder = XzEncoder::new(output, level as u32);
        io::copy(input, &mut encoder).map_err(|e| HarnessError::io("xz compress", e))?;
        encoder
            .finish()
            .map_err(|e| HarnessError::io("xz finish", e))?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let mut decoder = XzDecoder::new(input);
        io::copy(&mut decoder, output).map_err(|e| HarnessError::CorruptArtifact {
            codec: self.name(),
            source: e,
        })?;
        Ok(())
    }
}
