pub use spotfinder_boundary::*;

use spotfinder_core::{
    entities as e, gateways::broadcast::ReportEvent, usecases, util::recency::time_ago,
};

pub mod from_json {
    //! JSON -> Entity

    use super::*;

    // NOTE:
    // We cannot impl From<T> here, because the JSON structs
    // and the use case parameters both are outside this crate.

    pub fn new_report(from: NewReport) -> usecases::NewReport {
        let NewReport {
            lat,
            lng,
            status,
            note,
        } = from;
        usecases::NewReport {
            lat,
            lng,
            status,
            note,
        }
    }

    pub fn new_rating(report_id: String, from: RateReport) -> usecases::NewRating {
        usecases::NewRating {
            report_id,
            value: from.value(),
        }
    }
}

pub mod to_json {
    //! Entity -> JSON

    use super::*;

    /// Meters, rounded to one decimal.
    pub fn distance(d: e::Distance) -> f64 {
        (d.to_meters() * 10.0).round() / 10.0
    }

    pub fn report(from: e::Report, now: e::Timestamp) -> Report {
        let created_ago = time_ago(from.created_at, now);
        Report {
            created_ago: Some(created_ago),
            ..from.into()
        }
    }

    pub fn nearby_report(from: e::Report, d: e::Distance, now: e::Timestamp) -> Report {
        Report {
            distance: Some(distance(d)),
            ..report(from, now)
        }
    }

    pub fn live_event(from: ReportEvent, now: e::Timestamp) -> LiveEvent {
        match from {
            ReportEvent::Created(r) => LiveEvent::ReportNew(report(r, now)),
            ReportEvent::Rated {
                id,
                accuracy,
                total,
            } => LiveEvent::ReportRated(RatingResult {
                id: id.into(),
                accuracy,
                total_ratings: total,
            }),
            ReportEvent::Expired { id } => LiveEvent::ReportExpired(ExpiredReport { id: id.into() }),
        }
    }
}
