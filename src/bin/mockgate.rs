//! mockgate - mock health/status and gateway server

use clap::Parser;
use mockgate::config::{load_config, load_config_with_env_file, validate_config, HealthShape};
use mockgate::Server;
use secrecy::SecretString;
use std::path::PathBuf;
use tracing::{error, info, warn};

// ---- CLI ----

#[derive(Parser)]
#[command(name = "mockgate", version, about = "Mock health/status and gateway WebSocket server")]
struct Args {
    /// Env file read before the config file is looked up
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Config file (TOML or JSON5)
    #[arg(long, short, env = "MOCKGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    bind: Option<String>,

    /// Port
    #[arg(long, short)]
    port: Option<u16>,

    /// Bearer token expected on /api/*
    #[arg(long)]
    token: Option<String>,

    /// Health document layout (plain or annotated)
    #[arg(long)]
    shape: Option<HealthShape>,

    /// File streamed as the gateway's binary frame
    #[arg(long)]
    artifact: Option<PathBuf>,
}

// ---- Main ----

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env before anything reads RUST_LOG or MOCKGATE_*
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    // Load config: defaults < file < env < flags
    let mut config = match &args.env_file {
        Some(env_file) => load_config_with_env_file(args.config.as_deref(), env_file)?,
        None => load_config(args.config.as_deref())?,
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(token) = args.token {
        config.auth.token = SecretString::from(token);
    }
    if let Some(shape) = args.shape {
        config.health.shape = shape;
    }
    if let Some(artifact) = args.artifact {
        config.gateway.artifact = artifact;
    }

    let validation = validate_config(&config);
    for issue in &validation.warnings {
        warn!("{}", issue);
    }
    if !validation.valid {
        for issue in &validation.errors {
            error!("{}", issue);
        }
        anyhow::bail!("invalid configuration");
    }

    info!(
        shape = %config.health.shape,
        artifact = %config.gateway.artifact.display(),
        "{} v{}",
        mockgate::NAME,
        mockgate::VERSION
    );

    // Bind and serve
    let server = Server::bind(&config).await?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
