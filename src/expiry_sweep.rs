use spotfinder_application::prelude::expire_reports;
use spotfinder_db_sqlite::Connections;
use spotfinder_gateways::hub::BroadcastHub;
use std::time::Duration;

pub async fn run(connections: Connections, hub: BroadcastHub, interval: Duration) {
    let mut interval = tokio::time::interval(interval);
    loop {
        interval.tick().await;
        let connections = connections.clone();
        let hub = hub.clone();
        // SQLite blocks while holding the exclusive connection
        if let Err(err) =
            tokio::task::spawn_blocking(move || sweep_once(&connections, &hub)).await
        {
            log::error!("Sweeping overdue reports failed: {err}");
        }
    }
}

/// Returns the number of expired reports.
fn sweep_once(connections: &Connections, hub: &BroadcastHub) -> usize {
    match expire_reports(connections, hub) {
        Ok(expired) => {
            if !expired.is_empty() {
                log::info!("{} reports expired", expired.len());
            }
            expired.len()
        }
        Err(err) => {
            log::warn!("Overdue reports could not be expired: {err}");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotfinder_core::{
        entities::{CellKey, MapPoint, NearbySubscription, Report, Timestamp},
        gateways::broadcast::ReportEvent,
        repositories::ReportRepo as _,
    };
    use spotfinder_entities::builders::*;
    use spotfinder_gateways::hub::EventReceiver;

    fn setup_overdue_report() -> (Connections, BroadcastHub, EventReceiver) {
        let connections = Connections::init(":memory:", 1).unwrap();
        spotfinder_db_sqlite::run_embedded_database_migrations(connections.exclusive().unwrap())
            .unwrap();
        let report = Report::build()
            .id("overdue")
            .lat_lng(45.5, -73.57)
            .created_at(Timestamp::from_millis(1_000))
            .expires_at(Timestamp::from_millis(2_000))
            .finish();
        connections
            .exclusive()
            .unwrap()
            .transaction(|conn| conn.create_report(&report))
            .unwrap();

        let hub = BroadcastHub::new();
        let (id, events) = hub.open_connection(8);
        let cell: CellKey = NearbySubscription {
            pos: MapPoint::from_lat_lng_deg(45.5, -73.57),
            radius: spotfinder_core::entities::Distance::from_meters(500.0),
        }
        .cell_key();
        assert!(hub.subscribe(id, cell));
        (connections, hub, events)
    }

    #[test]
    fn announce_expired_reports() {
        let (connections, hub, mut events) = setup_overdue_report();

        assert_eq!(sweep_once(&connections, &hub), 1);
        assert!(matches!(
            events.try_recv(),
            Ok(ReportEvent::Expired { id }) if id.as_str() == "overdue"
        ));

        // Reports expire only once
        assert_eq!(sweep_once(&connections, &hub), 0);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn sweep_periodically_in_the_background() {
        let (connections, hub, mut events) = setup_overdue_report();

        let sweep = tokio::spawn(run(connections, hub, Duration::from_millis(20)));
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap();
        assert!(matches!(
            event,
            Some(ReportEvent::Expired { id }) if id.as_str() == "overdue"
        ));
        sweep.abort();
    }
}
