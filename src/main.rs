use std::{
    path::PathBuf,
    process::ExitCode};

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use glacier_purge::{
    print_summary, Credentials, FleetSweeper, GlacierConnector, PurgeSettings, StdinConfirm, SweepConfig};

// conventional exit status after SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser, Debug)]
#[command(author, version, about = "Empty and tear down AWS Glacier vaults, region by region", long_about = None)]
struct Args {
    /// AWS Access Key ID
    #[arg(long = "id", env = "AWS_ACCESS_KEY_ID")]
    access_key_id: Option<String>,

    /// AWS Secret Access Key
    #[arg(long = "secret", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Only scan this AWS Region
    #[arg(long)]
    region: Option<String>,

    /// Configuration file (defaults to ./glacier-purge.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SweepConfig, glacier_purge::SweepError> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SweepConfig::load_from_path(path)
        }
        None => SweepConfig::load(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let credentials = match (args.access_key_id, args.secret_access_key) {
        (Some(id), Some(secret)) => Credentials::new(id, secret),
        _ => {
            error!("AWS Access Key ID and Secret Access Key are required");
            return ExitCode::FAILURE;
        }
    };
    if !credentials.is_complete() {
        error!("AWS Access Key ID and Secret Access Key are required");
        return ExitCode::FAILURE;
    }

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let regions = config.region_set(args.region.as_deref());

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, stopping after the current step");
                cancel.cancel();
            }
        }
    });

    let mut sweeper = FleetSweeper::new(
        GlacierConnector::new(config.account_id.clone()),
        credentials,
        StdinConfirm::new(),
        PurgeSettings::from(&config),
        cancel,
    );
    let report = sweeper.sweep(&regions).await;
    print_summary(&report);

    if report.cancelled {
        ExitCode::from(EXIT_INTERRUPTED)
    } else if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
