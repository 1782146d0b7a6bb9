use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::error;

use archive_bench::{publish, Driver, FailurePolicy, HarnessConfig, PublishConfig};

/// Compare compression codecs and levels on a sample directory.
#[derive(Parser, Debug)]
#[command(name = "archive-bench", version, about)]
struct Args {
    /// Directory containing the sample corpus.
    #[arg(long, default_value = "samples/case")]
    sample_dir: PathBuf,

    /// Directory where per-trial artifacts are written.
    #[arg(long, default_value = "samples")]
    work_dir: PathBuf,

    /// Pause between trials, in milliseconds.
    #[arg(long, default_value_t = 500)]
    cooldown_ms: u64,

    /// JSON config file; command-line flags override its dirs and policy.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Abort the whole run on the first failing trial.
    #[arg(long)]
    fail_fast: bool,

    /// Endpoint of an external charting service to publish series to.
    #[arg(long)]
    publish: Option<String>,

    /// Credential for the charting service.
    #[arg(long, env = "ARCHIVE_BENCH_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarnessConfig::new(&args.sample_dir, &args.work_dir),
    };
    if args.config.is_none() {
        config.cooldown_ms = args.cooldown_ms;
    }
    if args.fail_fast {
        config.policy = FailurePolicy::FailFast;
    }
    if let Some(endpoint) = &args.publish {
        config.publish = Some(PublishConfig {
            endpoint: endpoint.clone(),
            token: args.token.clone(),
        });
    }

    let publish_config = config.publish.clone();
    let table = Driver::new(config).run().context("benchmark run failed")?;
    println!("{}", table.render());

    // Publish failures never invalidate the rendered table.
    if let Some(publish_config) = publish_config {
        if let Err(e) = publish(&table, &publish_config) {
            error!("{e}");
        }
    }

    Ok(())
}
