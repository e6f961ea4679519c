use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use plotbot_api::config::{PlotbotConfig, deployment_dir};
use plotbot_api::tracing_setup::init_tracing;
use plotbot_core::{QaService, loader};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "plotbot", version, about = "PlotBot question/answer lookup service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (the default)
    Serve(ServeArgs),
    /// Load a data file and print a summary without serving
    Check {
        /// CSV file to validate
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,
    /// Port to bind
    #[arg(long)]
    port: Option<u16>,
    /// Data file; relative paths resolve against the executable's directory
    #[arg(long)]
    data: Option<PathBuf>,
    /// Exit instead of serving when the data file cannot be loaded
    #[arg(long)]
    fail_fast: bool,
}

impl ServeArgs {
    fn apply(self, mut config: PlotbotConfig) -> PlotbotConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data) = self.data {
            config.data.path = data;
        }
        if self.fail_fast {
            config.data.fail_fast = true;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = PlotbotConfig::load()?.apply_profile();
    init_tracing(&config.logging)?;
    config.log_notices();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting PlotBot");

    match cli.command.unwrap_or_else(|| Command::Serve(ServeArgs::default())) {
        Command::Check { path } => check_command(&path),
        Command::Serve(args) => start_server(args.apply(config)).await,
    }
}

fn check_command(path: &std::path::Path) -> anyhow::Result<()> {
    let index = loader::try_load(path)
        .with_context(|| format!("Data file '{}' failed validation", path.display()))?;

    println!("{}: {} rows, {} subjects", path.display(), index.row_count(), index.subject_count());
    for subject in index.subjects() {
        let count = index.questions(subject).map_or(0, <[String]>::len);
        println!("  {subject}: {count} questions");
    }
    Ok(())
}

async fn start_server(config: PlotbotConfig) -> anyhow::Result<()> {
    let dataset = plotbot_api::load_dataset(&config.data, &deployment_dir())
        .context("Question data failed to load and fail_fast is enabled")?;

    if !dataset.is_loaded() {
        warn!("Serving without question data; data endpoints will answer 500");
    }

    let app = plotbot_api::create_app(QaService::new(dataset));
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "PlotBot API listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("PlotBot API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
