#[macro_use]
extern crate log;

use spotfinder_db_sqlite::Connections;
use spotfinder_gateways::hub::BroadcastHub;

mod adapters;
mod web;

pub use web::Cfg;

pub async fn run(
    connections: Connections,
    hub: BroadcastHub,
    enable_cors: bool,
    cfg: Cfg,
    version: &'static str,
) {
    web::run(connections, hub, enable_cors, cfg, version).await;
}
