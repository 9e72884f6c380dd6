use clap::Parser;
use spotfinder_db_sqlite::{run_embedded_database_migrations, Connections};
use spotfinder_gateways::hub::BroadcastHub;
use std::path::PathBuf;

mod config;
mod expiry_sweep;

use self::config::Config;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Real-time parking spot reports
#[derive(Parser, Debug)]
#[command(name = "spotfinder", version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// URL to the database
    #[arg(long, value_name = "DATABASE_URL")]
    db_url: Option<String>,

    /// Allow requests from any origin
    #[arg(long)]
    enable_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = Config::try_load_from_file_or_default(args.config_file.as_ref())?;
    if let Some(db_url) = args.db_url {
        cfg.db.conn_sqlite = db_url;
    }

    log::info!(
        "Connecting to SQLite database '{}' (pool size = {})",
        cfg.db.conn_sqlite,
        cfg.db.conn_pool_size
    );
    let connections = Connections::init(&cfg.db.conn_sqlite, cfg.db.conn_pool_size.into())?;
    run_embedded_database_migrations(connections.exclusive()?)?;

    let hub = BroadcastHub::new();
    match cfg.reports.sweep_interval {
        Some(interval) => {
            log::info!("Expiring overdue reports every {}s", interval.as_secs());
            tokio::spawn(expiry_sweep::run(connections.clone(), hub.clone(), interval));
        }
        None => log::info!("Background expiry of reports is disabled"),
    }

    let enable_cors = args.enable_cors || cfg.webserver.enable_cors;
    spotfinder_webserver::run(connections, hub, enable_cors, cfg.webserver_cfg(), VERSION).await;
    Ok(())
}
