use rocket::{config::Config as RocketCfg, local::blocking::Client, Route};
use spotfinder_db_sqlite::Connections;
use spotfinder_gateways::hub::BroadcastHub;

use super::Cfg;

pub mod prelude {

    pub const DUMMY_VERSION: &str = "3.2.1";
    pub const JWT_SECRET: &str = "not-so-secret";

    pub use rocket::{
        http::{ContentType, Header, Status},
        local::blocking::{Client, LocalResponse},
    };

    pub use super::{rocket_test_setup, rocket_test_setup_with_cfg, TestBackend};

    pub use crate::web::Cfg;
}

pub struct TestBackend {
    pub connections: Connections,
    pub hub: BroadcastHub,
    jwt: super::jwt::JwtState,
}

impl TestBackend {
    /// `Authorization` header value for `user_id`
    pub fn bearer(&self, user_id: &str) -> String {
        let token = self.jwt.generate_token(user_id).unwrap();
        format!("Bearer {token}")
    }
}

fn rocket_test_instance_with_cfg(
    mounts: Vec<(&'static str, Vec<Route>)>,
    cfg: Cfg,
    rocket_cfg: RocketCfg,
) -> (rocket::Rocket<rocket::Build>, TestBackend) {
    let connections = Connections::init(":memory:", 1).unwrap();
    spotfinder_db_sqlite::run_embedded_database_migrations(connections.exclusive().unwrap())
        .unwrap();
    let hub = BroadcastHub::new();
    let jwt = super::jwt::JwtState::new(Some(prelude::JWT_SECRET));
    let options = super::InstanceOptions {
        mounts,
        rocket_cfg: Some(rocket_cfg),
        cfg,
        version: prelude::DUMMY_VERSION,
    };
    let rocket = super::rocket_instance(options, connections.clone(), hub.clone());
    (
        rocket,
        TestBackend {
            connections,
            hub,
            jwt,
        },
    )
}

pub fn rocket_test_setup(mounts: Vec<(&'static str, Vec<Route>)>) -> (Client, TestBackend) {
    rocket_test_setup_with_cfg(
        mounts,
        Cfg {
            jwt_secret: Some(prelude::JWT_SECRET.into()),
            ..Default::default()
        },
    )
}

pub fn rocket_test_setup_with_cfg(
    mounts: Vec<(&'static str, Vec<Route>)>,
    cfg: Cfg,
) -> (Client, TestBackend) {
    let rocket_cfg = RocketCfg::debug_default();
    let (rocket, backend) = rocket_test_instance_with_cfg(mounts, cfg, rocket_cfg);
    let client = Client::tracked(rocket).unwrap();
    (client, backend)
}
