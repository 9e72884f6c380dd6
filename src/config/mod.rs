use anyhow::{anyhow, Result};
use spotfinder_core::{entities::Distance, usecases::ReportSettings};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "spotfinder.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";
const ENV_NAME_JWT_SECRET: &str = "JWT_SECRET";

pub struct Config {
    pub db: Db,
    pub reports: Reports,
    pub live: Live,
    pub auth: Auth,
    pub webserver: WebServer,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        if let Ok(secret) = env::var(ENV_NAME_JWT_SECRET) {
            cfg.auth.jwt_secret = Some(secret);
        }
        Ok(cfg)
    }

    pub fn webserver_cfg(&self) -> spotfinder_webserver::Cfg {
        spotfinder_webserver::Cfg {
            reports: self.reports.settings,
            anonymous_reports: self.auth.anonymous_reports,
            live_channel_capacity: self.live.channel_capacity,
            jwt_secret: self.auth.jwt_secret.clone(),
        }
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u8,
}

pub struct Reports {
    pub settings: ReportSettings,
    /// Disabled if `None`
    pub sweep_interval: Option<Duration>,
}

pub struct Live {
    pub channel_capacity: usize,
}

pub struct Auth {
    pub anonymous_reports: bool,
    pub jwt_secret: Option<String>,
}

pub struct WebServer {
    pub enable_cors: bool,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            reports,
            live,
            auth,
            webserver,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
        } = db.unwrap_or_default();

        if connection_pool_size == 0 {
            return Err(anyhow!("The connection pool must not be empty"));
        }
        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
        };

        let raw::Reports {
            ttl,
            default_radius,
            max_radius,
            sweep_interval,
        } = reports.unwrap_or_default();

        if ttl.is_zero() {
            return Err(anyhow!("The lifetime of reports must be positive"));
        }
        if !(default_radius > 0.0 && default_radius <= max_radius) {
            return Err(anyhow!(
                "Invalid radius limits: default = {default_radius}, max = {max_radius}"
            ));
        }
        if sweep_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(anyhow!("The sweep interval must be positive"));
        }
        let reports = Reports {
            settings: ReportSettings {
                ttl: time::Duration::try_from(ttl)?,
                default_radius: Distance::from_meters(default_radius),
                max_radius: Distance::from_meters(max_radius),
            },
            sweep_interval,
        };

        let raw::Live { channel_capacity } = live.unwrap_or_default();
        if channel_capacity == 0 {
            return Err(anyhow!("The live channel capacity must be positive"));
        }
        let live = Live { channel_capacity };

        let raw::Auth {
            anonymous_reports,
            jwt_secret,
        } = auth.unwrap_or_default();
        let auth = Auth {
            anonymous_reports,
            jwt_secret,
        };

        let raw::WebServer { cors } = webserver.unwrap_or_default();
        let webserver = WebServer { enable_cors: cors };

        Ok(Self {
            db,
            reports,
            live,
            auth,
            webserver,
        })
    }
}
