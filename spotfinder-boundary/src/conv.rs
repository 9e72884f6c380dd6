use super::*;
use spotfinder_entities as e;

impl From<e::report::ReportStatus> for ReportStatus {
    fn from(from: e::report::ReportStatus) -> Self {
        use e::report::ReportStatus as E;
        match from {
            E::Available => Self::Available,
            E::Taken => Self::Taken,
        }
    }
}

impl From<ReportStatus> for e::report::ReportStatus {
    fn from(from: ReportStatus) -> Self {
        use ReportStatus as B;
        match from {
            B::Available => Self::Available,
            B::Taken => Self::Taken,
        }
    }
}

impl From<e::report::Report> for Report {
    fn from(from: e::report::Report) -> Self {
        let accuracy = from.accuracy();
        let e::report::Report {
            id,
            pos,
            status,
            note,
            owner: _,
            created_at,
            expires_at,
            ratings,
            is_active,
        } = from;
        let (lat, lng) = pos.to_lat_lng_deg();
        Self {
            id: id.into(),
            lat,
            lng,
            status: status.into(),
            note,
            created_at: created_at.as_millis(),
            expires_at: expires_at.as_millis(),
            accuracy,
            total_ratings: ratings.total,
            is_active,
            created_ago: None,
            distance: None,
        }
    }
}

impl From<&e::report::Report> for RatingResult {
    fn from(from: &e::report::Report) -> Self {
        Self {
            id: from.id.to_string(),
            accuracy: from.accuracy(),
            total_ratings: from.ratings.total,
        }
    }
}

impl From<e::subscription::CellKey> for Subscribed {
    fn from(from: e::subscription::CellKey) -> Self {
        Self {
            cell: from.to_string(),
        }
    }
}
