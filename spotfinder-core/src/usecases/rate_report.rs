use super::prelude::*;
use crate::repositories::Error as RepoError;

#[derive(Debug, Clone)]
pub struct NewRating {
    pub report_id: String,
    pub value: i64,
}

/// Record a vote and return the report with its updated aggregate.
///
/// Must run inside a single transaction so that the liveness check
/// and the increment observe the same state.
pub fn rate_report<R>(repo: &R, rater: &UserId, rating: NewRating, now: Timestamp) -> Result<Report>
where
    R: ReportRepo + RatingRepo,
{
    let NewRating { report_id, value } = rating;
    let value = RatingValue::try_from(value)?;
    if !rater.is_valid() {
        return Err(Error::Unauthorized);
    }
    let mut report = repo.get_report(&report_id)?;
    if !report.is_live_at(now) {
        return Err(Error::Expired);
    }
    let rating = Rating {
        id: Id::new(),
        report_id: report.id.clone(),
        rater: rater.clone(),
        value,
        created_at: now,
    };
    report.ratings = repo.add_rating(&rating).map_err(|err| match err {
        RepoError::AlreadyExists => Error::AlreadyRated,
        err => err.into(),
    })?;
    Ok(report)
}
