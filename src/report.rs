//! Result accumulation, table rendering, and the optional chart publish.

use log::info;
use prettytable::{row, Table};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::trial::TrialRecord;

/// Ordered sequence of trial records; insertion order is execution order.
#[derive(Debug, Default)]
pub struct ResultTable {
    records: Vec<TrialRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends in call order; never reorders or deduplicates.
    pub fn record(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders every record as a text table. An empty run still yields a
    /// valid header-only table.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.add_row(row![
            "Codec",
            "Level",
            "Total Time (ms)",
            "Comp Time (ms)",
            "Decomp Time (ms)",
            "Final Size",
            "Ratio",
            "Comp Speed (MB/s)",
            "Decomp Speed (MB/s)"
        ]);
        for record in &self.records {
            table.add_row(row![
                record.codec,
                record.level,
                record.compress_ms + record.decompress_ms,
                record.compress_ms,
                record.decompress_ms,
                format!(
                    "{} ({} B)",
                    human_bytes(record.compressed_bytes),
                    record.compressed_bytes
                ),
                format!("{:.3}", record.ratio),
                format!("{:.2}", record.compress_mb_per_s),
                format!("{:.2}", record.decompress_mb_per_s),
            ]);
        }
        table.to_string()
    }

    /// Groups records into per-codec series for the 3-D scatter payload:
    /// x = compression speed, y = decompression speed, z = ratio.
    ///
    /// Pure transform; codecs appear in first-seen order, levels in
    /// execution order.
    pub fn series(&self) -> Vec<CodecSeries> {
        let mut series: Vec<CodecSeries> = Vec::new();
        for record in &self.records {
            let index = match series.iter().position(|s| s.name == record.codec) {
                Some(index) => index,
                None => {
                    series.push(CodecSeries::named(&record.codec));
                    series.len() - 1
                }
            };
            let entry = &mut series[index];
            entry.levels.push(record.level);
            entry.compress_mb_per_s.push(record.compress_mb_per_s);
            entry.decompress_mb_per_s.push(record.decompress_mb_per_s);
            entry.ratio.push(record.ratio);
        }
        series
    }
}

/// One named series for the external charting service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodecSeries {
    pub name: String,
    pub levels: Vec<i32>,
    pub compress_mb_per_s: Vec<f64>,
    pub decompress_mb_per_s: Vec<f64>,
    pub ratio: Vec<f64>,
}

impl CodecSeries {
    fn named(name: &str) -> Self {
        CodecSeries {
            name: name.to_string(),
            levels: Vec::new(),
            compress_mb_per_s: Vec::new(),
            decompress_mb_per_s: Vec::new(),
            ratio: Vec::new(),
        }
    }
}

/// Where to send the series payload. The token is opaque to the harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Forwards the grouped series to the external visualization sink.
///
/// Failures here never invalidate the benchmark itself; callers log and
/// carry on with the rendered table.
pub fn publish(table: &ResultTable, config: &PublishConfig) -> Result<()> {
    let series = table.series();
    let client = reqwest::blocking::Client::new();
    let mut request = client.post(&config.endpoint).json(&series);
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }
    let response = request.send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(HarnessError::PublishRejected(format!(
            "{} from {}",
            status, config.endpoint
        )));
    }
    info!("published {} series to {}", series.len(), config.endpoint);
    Ok(())
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
