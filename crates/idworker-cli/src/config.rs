use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::bail;
use clap::{Parser, Subcommand};
use idworker::{IDWORKER_EPOCH, IdWorkerId, SnowflakeId, WorkerConfig};

/// Runtime configuration for the `idworker` binary.
///
/// The worker identity and epoch are global options, parsed from CLI
/// arguments or environment variables (a `.env` file is loaded first). They
/// are validated once, when converting into [`CliConfig`], so an invalid
/// datacenter or worker ID stops the program before any ID is generated.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idworker",
    version,
    about = "Generate and decode time-ordered 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Datacenter this worker belongs to (0-31).
    ///
    /// Environment variable: `IDWORKER_DATACENTER_ID`
    #[arg(
        long,
        env = "IDWORKER_DATACENTER_ID",
        default_value_t = 0,
        allow_negative_numbers = true,
        global = true
    )]
    pub datacenter_id: i64,

    /// Worker ID within the datacenter (0-31).
    ///
    /// Every process generating IDs concurrently must use a distinct
    /// datacenter/worker pair.
    ///
    /// Environment variable: `IDWORKER_WORKER_ID`
    #[arg(
        long,
        env = "IDWORKER_WORKER_ID",
        default_value_t = 0,
        allow_negative_numbers = true,
        global = true
    )]
    pub worker_id: i64,

    /// Epoch, in milliseconds since 1970-01-01 UTC, that ID timestamps are
    /// relative to. IDs are only comparable when generated against the same
    /// epoch.
    ///
    /// Environment variable: `IDWORKER_EPOCH_MS`
    #[arg(
        long,
        env = "IDWORKER_EPOCH_MS",
        default_value_t = IDWORKER_EPOCH.as_millis() as u64,
        global = true
    )]
    pub epoch_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate IDs and print one per line.
    Generate {
        /// How many IDs to generate.
        #[arg(short = 'n', long, default_value_t = 10_000)]
        count: usize,

        /// Number of threads sharing one generator.
        #[arg(short, long, default_value_t = 1)]
        threads: usize,

        /// Only report timing, don't print the IDs.
        #[arg(short, long, default_value_t = false)]
        quiet: bool,
    },
    /// Print the fields packed into each ID.
    Decode {
        /// Raw decimal IDs.
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub worker: WorkerConfig<IdWorkerId>,
    pub epoch: Duration,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let worker = WorkerConfig::new(args.datacenter_id, args.worker_id)?;

        if let Command::Generate { threads, .. } = args.command {
            if threads == 0 {
                bail!("--threads must be greater than 0");
            }
        }

        let now_ms = u64::try_from(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis())?;

        Ok(Self {
            worker,
            epoch: validate_epoch(args.epoch_ms, now_ms)?,
            command: args.command,
        })
    }
}

/// Checks that the current time is representable against `epoch_ms`.
///
/// A future epoch freezes the clock at zero and an epoch further back than
/// the 41-bit timestamp field would wrap the timestamp.
fn validate_epoch(epoch_ms: u64, now_ms: u64) -> anyhow::Result<Duration> {
    let Some(elapsed) = now_ms.checked_sub(epoch_ms) else {
        bail!("--epoch-ms {epoch_ms} is later than the current time {now_ms}");
    };
    if elapsed > IdWorkerId::max_timestamp() {
        bail!(
            "--epoch-ms {epoch_ms} is too far in the past: {elapsed} ms elapsed, timestamps hold at most {}",
            IdWorkerId::max_timestamp()
        );
    }
    Ok(Duration::from_millis(epoch_ms))
}
