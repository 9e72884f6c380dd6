pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::report_builder::*;

pub mod report_builder {

    use super::*;
    use crate::{geo::*, id::*, report::*, time::*, user::*};

    #[derive(Debug)]
    pub struct ReportBuild {
        report: Report,
    }

    impl ReportBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.report.id = id.into();
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.report.pos = pos;
            self
        }
        pub fn lat_lng(self, lat: f64, lng: f64) -> Self {
            self.pos(MapPoint::from_lat_lng_deg(lat, lng))
        }
        pub fn status(mut self, status: ReportStatus) -> Self {
            self.report.status = status;
            self
        }
        pub fn note(mut self, note: &str) -> Self {
            self.report.note = Some(note.into());
            self
        }
        pub fn owner(mut self, owner: &str) -> Self {
            self.report.owner = Some(UserId::from(owner));
            self
        }
        pub fn created_at(mut self, created_at: Timestamp) -> Self {
            self.report.created_at = created_at;
            self
        }
        pub fn expires_at(mut self, expires_at: Timestamp) -> Self {
            self.report.expires_at = expires_at;
            self
        }
        pub fn ratings(mut self, total: u64, sum: i64) -> Self {
            self.report.ratings = ReportRatings { total, sum };
            self
        }
        pub fn active(mut self, is_active: bool) -> Self {
            self.report.is_active = is_active;
            self
        }
        pub fn finish(self) -> Report {
            self.report
        }
    }

    impl Builder for Report {
        type Build = ReportBuild;
        fn build() -> ReportBuild {
            let created_at = Timestamp::now();
            ReportBuild {
                report: Report {
                    id: Id::new(),
                    pos: MapPoint::from_lat_lng_deg(0.0, 0.0),
                    status: ReportStatus::Available,
                    note: None,
                    owner: None,
                    created_at,
                    expires_at: created_at + time::Duration::minutes(30),
                    ratings: ReportRatings::default(),
                    is_active: true,
                },
            }
        }
    }
}
