use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use leadchat_gateway::config::LoadOptions;
use leadchat_gateway::{Config, Daemon};

/// leadchat - chat widget backend with FAQ answers, lead capture and TTS
#[derive(Parser)]
#[command(name = "leadchat", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "LEADCHAT_PORT")]
    port: Option<u16>,

    /// Directory holding index.html and widget assets
    #[arg(long, env = "LEADCHAT_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.config/leadchat/config.toml)
    #[arg(short, long, env = "LEADCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 => "info,leadchat_gateway=info",
        1 => "info,leadchat_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = LoadOptions {
        port: cli.port,
        static_dir: cli.static_dir,
        config_path: cli.config,
    };

    let config = Config::load(&options)?;
    tracing::debug!(?config, "loaded configuration");

    tracing::info!(port = config.server.port, "starting leadchat gateway");

    let daemon = Daemon::new(config).await;
    daemon.run().await?;

    Ok(())
}
