use rocket::{config::Config as RocketCfg, Rocket, Route};
use spotfinder_core::usecases::ReportSettings;
use spotfinder_db_sqlite::Connections;
use spotfinder_gateways::hub::BroadcastHub;

pub mod api;
mod guards;
pub mod jwt;
mod live;

#[cfg(test)]
pub mod tests;

#[derive(Debug, Clone)]
pub struct Cfg {
    pub reports: ReportSettings,
    /// Allow reports without an authenticated owner
    pub anonymous_reports: bool,
    /// Queued events per live connection
    pub live_channel_capacity: usize,
    pub jwt_secret: Option<String>,
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            reports: ReportSettings::default(),
            anonymous_reports: true,
            live_channel_capacity: 64,
            jwt_secret: None,
        }
    }
}

pub(crate) struct InstanceOptions {
    mounts: Vec<(&'static str, Vec<Route>)>,
    rocket_cfg: Option<RocketCfg>,
    cfg: Cfg,
    version: &'static str,
}

pub(crate) fn rocket_instance(
    options: InstanceOptions,
    connections: Connections,
    hub: BroadcastHub,
) -> Rocket<rocket::Build> {
    let InstanceOptions {
        mounts,
        rocket_cfg,
        cfg,
        version,
    } = options;

    let jwt_state = jwt::JwtState::new(cfg.jwt_secret.as_deref());

    let r = match rocket_cfg {
        Some(cfg) => rocket::custom(cfg),
        None => rocket::build(),
    };

    let mut instance = r
        .manage(connections)
        .manage(hub)
        .manage(jwt_state)
        .manage(cfg)
        .manage(guards::Version(version));

    for (m, r) in mounts {
        instance = instance.mount(m, r);
    }
    instance
}

fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![("/api", api::routes())]
}

pub async fn run(
    connections: Connections,
    hub: BroadcastHub,
    enable_cors: bool,
    cfg: Cfg,
    version: &'static str,
) {
    let options = InstanceOptions {
        mounts: mounts(),
        rocket_cfg: None,
        cfg,
        version,
    };
    let instance = rocket_instance(options, connections, hub);
    let server_task = if enable_cors {
        match rocket_cors::CorsOptions::default().to_cors() {
            Ok(cors) => instance.attach(cors).launch(),
            Err(err) => {
                error!("Invalid CORS configuration: {err}");
                return;
            }
        }
    } else {
        instance.launch()
    };
    if let Err(err) = server_task.await {
        error!("Unable to run web server: {err}");
    }
}
