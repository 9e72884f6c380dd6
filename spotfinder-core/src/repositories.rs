// Low-level database access traits.
// Each repository is responsible for a single entity and
// its relationships. Related entities are only referenced
// by their id and never modified by another repository.

use crate::entities::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait ReportRepo {
    fn create_report(&self, report: &Report) -> Result<()>;

    // Includes inactive reports
    fn get_report(&self, id: &str) -> Result<Report>;

    /// All active reports within `bbox` that expire after `now`.
    fn find_live_reports_in_bbox(&self, bbox: &MapBbox, now: Timestamp) -> Result<Vec<Report>>;

    /// Deactivate all active reports that expired at or before `now`
    /// and return them with the updated state.
    fn expire_reports(&self, now: Timestamp) -> Result<Vec<Report>>;
}

pub trait RatingRepo {
    /// Store the rating and add its value to the aggregate of the
    /// rated report. Fails with `AlreadyExists` if the rater has
    /// already rated this report.
    fn add_rating(&self, rating: &Rating) -> Result<ReportRatings>;
}

pub trait FavoriteRepo {
    fn add_favorite(&self, favorite: &Favorite) -> Result<()>;
    fn remove_favorite(&self, user: &UserId, report_id: &str) -> Result<()>;

    // Most recently added first
    fn favorites_of_user(&self, user: &UserId) -> Result<Vec<(Favorite, Report)>>;
    fn favorite_report_ids_of_user(&self, user: &UserId) -> Result<Vec<Id>>;
}
