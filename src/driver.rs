//! Sequences the benchmark matrix and owns the result table.

use std::fs;
use std::thread;
use std::time::Duration;

use log::{error, info, warn};

use crate::config::{FailurePolicy, HarnessConfig};
use crate::error::{HarnessError, Result};
use crate::report::ResultTable;
use crate::sample::SampleSource;
use crate::stream::CancelToken;
use crate::trial::TrialRunner;

/// Runs the configured matrix strictly sequentially.
///
/// Trials never overlap so one codec's CPU and I/O load cannot perturb
/// another's timings; the only pauses are the inter-trial cooldown sleeps.
pub struct Driver {
    config: HarnessConfig,
    cancel: CancelToken,
}

impl Driver {
    pub fn new(config: HarnessConfig) -> Self {
        Driver {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Token shared with the in-flight trial; firing it stops the run after
    /// the current stream read, leaving only completed records in the table.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run(&self) -> Result<ResultTable> {
        let sample = SampleSource::open(&self.config.sample_dir)?;
        info!(
            "sample {} is {} bytes, {} matrix entries",
            self.config.sample_dir.display(),
            sample.total_bytes(),
            self.config.matrix.len()
        );
        fs::create_dir_all(&self.config.work_dir).map_err(|e| {
            HarnessError::io(
                format!("create work dir {}", self.config.work_dir.display()),
                e,
            )
        })?;

        let mut runner = TrialRunner::new(&sample, &self.config.work_dir, self.cancel.clone());
        let mut table = ResultTable::new();

        for (index, spec) in self.config.matrix.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("run cancelled after {} completed trials", table.len());
                break;
            }
            if index > 0 && self.config.cooldown_ms > 0 {
                thread::sleep(Duration::from_millis(self.config.cooldown_ms));
            }

            info!("trial {}/{}: {spec}", index + 1, self.config.matrix.len());
            match runner.run(spec) {
                Ok(record) => {
                    info!(
                        "{spec}: {} -> {} bytes, ratio {:.3}, {} ms / {} ms",
                        record.total_bytes,
                        record.compressed_bytes,
                        record.ratio,
                        record.compress_ms,
                        record.decompress_ms
                    );
                    table.record(record);
                }
                Err(HarnessError::Cancelled) => {
                    warn!("run cancelled during {spec}");
                    break;
                }
                Err(e) => match self.config.policy {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::ContinueOnError => {
                        error!("skipping {spec}: {e}");
                    }
                },
            }
        }

        Ok(table)
    }
}
