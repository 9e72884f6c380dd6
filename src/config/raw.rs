use duration_str::{deserialize_duration, deserialize_option_duration};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("spotfinder.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db: Option<Db>,
    pub reports: Option<Reports>,
    pub live: Option<Live>,
    pub auth: Option<Auth>,
    pub webserver: Option<WebServer>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Db {
    pub connection_sqlite: String,
    pub connection_pool_size: u8,
}

impl Default for Db {
    fn default() -> Self {
        Config::default().db.expect("DB configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Reports {
    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,
    pub default_radius: f64,
    pub max_radius: f64,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub sweep_interval: Option<Duration>,
}

impl Default for Reports {
    fn default() -> Self {
        Config::default().reports.expect("Reports configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Live {
    pub channel_capacity: usize,
}

impl Default for Live {
    fn default() -> Self {
        Config::default().live.expect("Live configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Auth {
    pub anonymous_reports: bool,
    pub jwt_secret: Option<String>,
}

impl Default for Auth {
    fn default() -> Self {
        Config::default().auth.expect("Auth configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WebServer {
    pub cors: bool,
}

impl Default for WebServer {
    fn default() -> Self {
        Config::default()
            .webserver
            .expect("Webserver configuration")
    }
}
