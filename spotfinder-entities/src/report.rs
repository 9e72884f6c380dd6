use strum::{AsRefStr, Display, EnumString};

use crate::{geo::*, id::*, rating::RatingValue, time::*, user::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
    Available,
    Taken,
}

pub type ReportStatusPrimitive = i16;

impl ReportStatus {
    pub const fn to_primitive(self) -> ReportStatusPrimitive {
        match self {
            Self::Available => 0,
            Self::Taken => 1,
        }
    }

    pub const fn try_from_primitive(from: ReportStatusPrimitive) -> Option<Self> {
        match from {
            0 => Some(Self::Available),
            1 => Some(Self::Taken),
            _ => None,
        }
    }
}

/// Running aggregate of all votes on a report.
///
/// Each distinct rater contributes exactly one `+1` or `-1` to `sum`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportRatings {
    pub total: u64,
    pub sum: i64,
}

impl ReportRatings {
    pub fn add(&mut self, value: RatingValue) {
        self.total += 1;
        self.sum += i64::from(value.to_i8());
    }

    /// Mean vote in `[-1, 1]`, rounded half up to one decimal.
    /// A report without votes has an accuracy of 0.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.sum as f64 / self.total as f64;
        (mean * 10.0 + 0.5).floor() / 10.0
    }
}

/// A user-submitted observation about a parking spot.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: Id,
    pub pos: MapPoint,
    pub status: ReportStatus,
    pub note: Option<String>,
    pub owner: Option<UserId>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub ratings: ReportRatings,
    /// Flips from `true` to `false` exactly once and never back.
    pub is_active: bool,
}

impl Report {
    pub fn accuracy(&self) -> f64 {
        self.ratings.accuracy()
    }

    /// A report is visible and rateable until it is either swept
    /// or its expiry time has passed.
    pub fn is_live_at(&self, now: Timestamp) -> bool {
        self.is_active && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;

    #[test]
    fn status_names() {
        assert_eq!(ReportStatus::Available.as_ref(), "available");
        assert_eq!("taken".parse::<ReportStatus>().unwrap(), ReportStatus::Taken);
        assert!("free".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn status_primitive_mapping() {
        for s in [ReportStatus::Available, ReportStatus::Taken] {
            assert_eq!(ReportStatus::try_from_primitive(s.to_primitive()), Some(s));
        }
        assert_eq!(ReportStatus::try_from_primitive(7), None);
    }

    #[test]
    fn accuracy_without_votes_is_zero() {
        assert_eq!(ReportRatings::default().accuracy(), 0.0);
    }

    #[test]
    fn accuracy_is_rounded_to_one_decimal() {
        let mut r = ReportRatings::default();
        r.add(RatingValue::Up);
        r.add(RatingValue::Up);
        r.add(RatingValue::Down);
        assert_eq!(r, ReportRatings { total: 3, sum: 1 });
        assert_eq!(r.accuracy(), 0.3);

        let r = ReportRatings { total: 4, sum: -1 };
        assert_eq!(r.accuracy(), -0.2);

        let r = ReportRatings { total: 2, sum: -2 };
        assert_eq!(r.accuracy(), -1.0);
    }

    #[test]
    fn liveness() {
        let now = Timestamp::from_millis(10_000);
        let report = Report::build()
            .expires_at(Timestamp::from_millis(10_001))
            .finish();
        assert!(report.is_live_at(now));
        assert!(!report.is_live_at(Timestamp::from_millis(10_001)));
        let inactive = Report::build()
            .expires_at(Timestamp::from_millis(20_000))
            .active(false)
            .finish();
        assert!(!inactive.is_live_at(now));
    }
}
