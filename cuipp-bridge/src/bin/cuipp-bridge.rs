use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cuipp_bridge::{logging, BridgeResult, PhonePlatform, PlatformConfig};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cuipp-bridge")]
#[command(about = "Expose Cisco IP phone message-waiting indicators as accessories")]
#[command(version)]
pub struct Args {
    /// Platform configuration file (JSON)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Run a named action on a phone and exit
    #[arg(long, requires = "action")]
    pub phone: Option<String>,

    /// Action to run with --phone
    #[arg(long, requires = "phone")]
    pub action: Option<String>,

    /// Print poller statistics on shutdown
    #[arg(long)]
    pub stats: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logging::init_logging_from_env() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Bridge stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> BridgeResult<()> {
    let config = PlatformConfig::from_file(&args.config)?;
    info!(path = %args.config.display(), phones = config.phones.len(), "Loaded configuration");

    let platform = PhonePlatform::new(config)?;
    let accessories = platform
        .start(|event| {
            info!(phone = %event.host, name = %event.information.host_name, state = %event.state, "Accessory updated");
        })
        .await;

    for accessory in &accessories {
        info!(
            phone = %accessory.host,
            name = accessory.name(),
            kind = ?accessory.kind,
            state = %accessory.state,
            "Accessory ready"
        );
    }

    if let (Some(phone), Some(action)) = (args.phone.as_deref(), args.action.as_deref()) {
        let status = platform.run_action(phone, action).await?;
        info!(phone, action, status, "Action pushed");
        platform.shutdown();
        return Ok(());
    }

    tokio::signal::ctrl_c().await?;
    info!("Interrupted, shutting down");

    if args.stats {
        println!("{}", platform.poller_stats());
    }
    platform.shutdown();
    Ok(())
}
