//! Binary entry point for secretaria.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use secretaria::config::Overrides;
use secretaria::{Loader, Router, Store};

/// Secretaria - REST endpoints over a school's administrative records.
#[derive(Parser)]
#[command(name = "secretaria")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "SECRETARIA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path prefix for every route (e.g. "/api"; "/" for none).
    #[arg(long)]
    prefix: Option<String>,

    /// Database URL (file path or `libsql://...`).
    #[arg(long)]
    database_url: Option<String>,

    /// Create missing tables before serving.
    #[arg(long)]
    bootstrap: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match serve(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("secretaria: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(cli: Cli) -> secretaria::Result<()> {
    let overrides = Overrides {
        host: cli.host.as_deref(),
        port: cli.port,
        prefix: cli.prefix.as_deref(),
        database_url: cli.database_url.as_deref(),
        bootstrap: cli.bootstrap,
    };
    let config = Loader::default().load(cli.config.as_deref(), &overrides)?;

    secretaria::telemetry::init(&config.log)?;
    tracing::info!(database = %config.database.url, "Opening database");

    let store = Arc::new(Store::open(&config.database).await?);

    let mut router = Router::with_prefix(config.server.prefix.clone());
    secretaria::school::register(&mut router);

    secretaria::server::run(&config.server, store, router.into_handle()).await
}
