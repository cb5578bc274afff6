//! footprint-server - couple footprint map backend
//!
//! Resolves the root folder (CLI → env → config.toml → OS default), opens or
//! creates the SQLite database inside it, and serves the JSON API.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use footprint_common::config::{self, RootFolder, ROOT_FOLDER_ENV};
use footprint_server::db::{self, SqliteStore};
use footprint_server::{AppState, ServerConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for footprint-server
#[derive(Parser, Debug)]
#[command(name = "footprint-server")]
#[command(about = "Couple footprint map API server")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "FOOTPRINT_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "FOOTPRINT_BIND")]
    bind: Option<IpAddr>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Database file (overrides <root>/footprint.db)
    #[arg(long, env = "FOOTPRINT_DATABASE")]
    database: Option<PathBuf>,

    /// Config file (defaults to the platform location)
    #[arg(short, long, env = "FOOTPRINT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footprint_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting footprint-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => config::load_file_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_default_file_config().context("Failed to load config file")?,
    };

    let root = RootFolder::new(config::resolve_root_folder(
        args.root_folder.as_deref(),
        ROOT_FOLDER_ENV,
        &file_config,
    ));
    root.ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", root.path().display());

    let db_path = args
        .database
        .or_else(|| file_config.server.database.clone())
        .unwrap_or_else(|| root.database_path());
    info!("Database path: {}", db_path.display());

    let pool = match db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let bind_ip = match args.bind {
        Some(ip) => ip,
        None => match file_config.server.bind.as_deref() {
            Some(text) => text
                .parse()
                .with_context(|| format!("Invalid bind address in config: {}", text))?,
            None => IpAddr::from([127, 0, 0, 1]),
        },
    };
    let port = args
        .port
        .or(file_config.server.port)
        .unwrap_or(DEFAULT_PORT);

    let server_config = ServerConfig {
        bind_addr: SocketAddr::new(bind_ip, port),
        max_body_bytes: file_config
            .server
            .max_body_bytes
            .unwrap_or(DEFAULT_MAX_BODY_BYTES),
    };

    let state = AppState::new(Arc::new(SqliteStore::new(pool)));
    footprint_server::run(server_config, state).await
}
