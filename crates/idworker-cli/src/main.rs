//! # idworker
//!
//! Command-line front end for the `idworker` crate. Generates batches of IDs
//! from one shared [`LockIdGenerator`](idworker::LockIdGenerator) and decodes
//! existing IDs back into their fields.
//!
//! ## Configuration
//!
//! | Option            | Environment variable     | Default          |
//! |-------------------|--------------------------|------------------|
//! | `--datacenter-id` | `IDWORKER_DATACENTER_ID` | `0`              |
//! | `--worker-id`     | `IDWORKER_WORKER_ID`     | `0`              |
//! | `--epoch-ms`      | `IDWORKER_EPOCH_MS`      | `1480166465631`  |
//!
//! A `.env` file in the working directory is loaded before parsing. Log
//! verbosity follows `RUST_LOG`.

use std::io;

use clap::Parser;
use config::{CliArgs, CliConfig, Command};
use tracing::debug;

mod command;
mod config;
mod telemetry;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    telemetry::init_telemetry()?;

    let config = CliConfig::try_from(args)?;
    debug!(?config, "loaded configuration");

    match config.command {
        Command::Generate {
            count,
            threads,
            quiet,
        } => {
            let out = (!quiet).then(|| io::stdout().lock());
            command::generate(config.worker, config.epoch, count, threads, out)?;
        }
        Command::Decode { ids } => command::decode(&ids, config.epoch, io::stdout().lock())?,
    }

    Ok(())
}
