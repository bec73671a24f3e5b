//! flare-refresh 命令行入口

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use flare_refresh::{
    BackendConfig, Config, RefreshLoop, RegistryFactory, ShutdownController, SnapshotWriter,
    telemetry,
};

/// Refreshes a load-balancing set from a service registry.
#[derive(Debug, Parser)]
#[command(name = "flare-refresh", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Emit logs as JSON (logs always go to stderr)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    backend: BackendCommand,
}

#[derive(Debug, Subcommand)]
enum BackendCommand {
    /// Poll an HTTP directory service
    Directory {
        /// Directory proxy address [default: proxy:1234]
        #[arg(long)]
        proxy: Option<String>,
        namespace: String,
        service_type: String,
    },
    /// Watch the children of a node in the coordination store (etcd)
    Store {
        /// Comma-separated endpoint list
        url: String,
        base_path: String,
    },
    /// Watch a local file listing one address per line
    File { path: PathBuf },
    /// Republish a fixed address list
    Static {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

impl From<BackendCommand> for BackendConfig {
    fn from(cmd: BackendCommand) -> Self {
        match cmd {
            BackendCommand::Directory {
                proxy,
                namespace,
                service_type,
            } => BackendConfig::directory(proxy, namespace, service_type),
            BackendCommand::Store { url, base_path } => BackendConfig::Store { url, base_path },
            BackendCommand::File { path } => BackendConfig::File { path },
            BackendCommand::Static { addresses } => BackendConfig::Static { addresses },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.log_json)?;

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let backend = BackendConfig::from(cli.backend);
    info!(backend = %backend, "Starting flare-refresh");

    let shutdown = ShutdownController::new();
    let _signals = shutdown.install_signal_handlers()?;

    let client = RegistryFactory::create_client(&backend, &config.refresh).await?;
    let mut refresh = RefreshLoop::new(client, SnapshotWriter::stdout(), shutdown.signal())
        .with_config(config.refresh.refresh_config(&backend));

    refresh.run().await?;
    Ok(())
}
