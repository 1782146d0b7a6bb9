//! Run configuration: sample location, matrix, cooldown, failure policy.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::CodecSpec;
use crate::error::{HarnessError, Result};
use crate::report::PublishConfig;

/// What to do when a single trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the whole run on the first failing trial.
    FailFast,
    /// Log the failure and move on to the next matrix entry.
    #[default]
    ContinueOnError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub sample_dir: PathBuf,
    pub work_dir: PathBuf,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default)]
    pub policy: FailurePolicy,
    #[serde(default = "default_matrix")]
    pub matrix: Vec<CodecSpec>,
    #[serde(default)]
    pub publish: Option<PublishConfig>,
}

impl HarnessConfig {
    pub fn new(sample_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        HarnessConfig {
            sample_dir: sample_dir.into(),
            work_dir: work_dir.into(),
            cooldown_ms: default_cooldown_ms(),
            policy: FailurePolicy::default(),
            matrix: default_matrix(),
            publish: None,
        }
    }

    /// Loads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HarnessError::io(format!("read config {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| {
            HarnessError::io(
                format!("parse config {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}

fn default_cooldown_ms() -> u64 {
    500
}

/// The default comparison matrix: gzip as the baseline, both zstd plumbing
/// variants at a fast/default/high spread, and one mid level for the rest.
pub fn default_matrix() -> Vec<CodecSpec> {
    let mut matrix = vec![CodecSpec::new("gzip", 6)];
    for level in [1, 3, 9] {
        matrix.push(CodecSpec::new("zstd", level));
    }
    for level in [1, 3, 9] {
        matrix.push(CodecSpec::new("zstd-pipe", level));
    }
    matrix.push(CodecSpec::new("brotli", 5));
    matrix.push(CodecSpec::new("xz", 6));
    matrix.push(CodecSpec::new("lz4", 4));
    matrix
}
