//! Benchmark harness comparing general-purpose compression codecs on a
//! tarred sample directory.
//!
//! Each trial packs the sample corpus, pipes it through one codec at one
//! level, persists the artifact, decompresses it into a null sink, and
//! records sizes, timings, ratio and throughput. Trials run strictly
//! sequentially so timings stay unperturbed; the driver renders the
//! collected table and can forward per-codec series to an external charting
//! service.

pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod report;
pub mod sample;
pub mod stream;
pub mod trial;

pub use codec::{Codec, CodecSpec};
pub use config::{default_matrix, FailurePolicy, HarnessConfig};
pub use driver::Driver;
pub use error::{HarnessError, Result};
pub use report::{publish, CodecSeries, PublishConfig, ResultTable};
pub use sample::SampleSource;
pub use stream::CancelToken;
pub use trial::{TrialRecord, TrialRunner};
