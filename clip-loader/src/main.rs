use action_clips::video::OpenCvReader;
use anyhow::{Context, Result};
use clip_loader::config::Config;
use std::{env, path::PathBuf, sync::Arc};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

#[derive(Debug, Clone, StructOpt)]
/// Load HMDB51 clips and print the training batches
struct Args {
    #[structopt(long)]
    /// configuration file, the built-in defaults are used if not set
    pub config_file: Option<PathBuf>,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    // parse arguments
    let Args { config_file } = Args::from_args();
    let config = match config_file {
        Some(config_file) => Config::open(&config_file).with_context(|| {
            format!("failed to load config file '{}'", config_file.display())
        })?,
        None => Config::default(),
    };

    clip_loader::start(Arc::new(config), Arc::new(OpenCvReader)).await?;

    Ok(())
}
