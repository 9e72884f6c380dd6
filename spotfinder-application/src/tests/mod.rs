
pub mod prelude {
    use parking_lot::Mutex;

    pub use spotfinder_core::{
        entities::*,
        gateways::broadcast::{ReportEvent, ReportEventGateway},
        repositories::{Error as RepoError, *},
        usecases,
    };
    pub use spotfinder_entities::builders::*;

    pub mod sqlite {
        pub use super::super::super::sqlite::*;
    }

    pub use crate::{
        error::{AppError, BError},
        prelude as flows,
    };

    pub fn setup() -> (sqlite::Connections, RecordingGateway) {
        let _ = env_logger::builder().is_test(true).try_init();
        let connections = sqlite::Connections::init(":memory:", 1).unwrap();
        spotfinder_db_sqlite::run_embedded_database_migrations(connections.exclusive().unwrap())
            .unwrap();
        (connections, RecordingGateway::default())
    }

    pub fn store(connections: &sqlite::Connections, report: &Report) {
        let db = connections.exclusive().unwrap();
        db.transaction(|conn| conn.create_report(report)).unwrap();
    }

    #[derive(Default)]
    pub struct RecordingGateway {
        published: Mutex<Vec<(MapPoint, ReportEvent)>>,
    }

    impl RecordingGateway {
        pub fn take(&self) -> Vec<(MapPoint, ReportEvent)> {
            std::mem::take(&mut *self.published.lock())
        }
    }

    impl ReportEventGateway for RecordingGateway {
        fn publish(&self, origin: MapPoint, event: ReportEvent) {
            self.published.lock().push((origin, event));
        }
    }

    pub fn new_report(lat: f64, lng: f64) -> usecases::NewReport {
        usecases::NewReport {
            lat,
            lng,
            status: "available".into(),
            note: None,
        }
    }

    pub fn vote(report_id: &Id, value: i64) -> usecases::NewRating {
        usecases::NewRating {
            report_id: report_id.to_string(),
            value,
        }
    }
}
