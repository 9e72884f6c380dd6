use crate::entities::*;

/// A mutation of the report store that interested clients
/// should learn about.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Created(Report),
    Rated {
        id: Id,
        accuracy: f64,
        total: u64,
    },
    Expired {
        id: Id,
    },
}

impl ReportEvent {
    pub fn rated(report: &Report) -> Self {
        Self::Rated {
            id: report.id.clone(),
            accuracy: report.accuracy(),
            total: report.ratings.total,
        }
    }

    pub fn expired(report: &Report) -> Self {
        Self::Expired {
            id: report.id.clone(),
        }
    }

    pub fn report_id(&self) -> &Id {
        match self {
            Self::Created(report) => &report.id,
            Self::Rated { id, .. } | Self::Expired { id } => id,
        }
    }
}

/// Fan-out of report events to everyone watching the area around `origin`.
///
/// Implementations must neither block nor fail the caller.
pub trait ReportEventGateway {
    fn publish(&self, origin: MapPoint, event: ReportEvent);
}
