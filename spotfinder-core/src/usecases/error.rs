use crate::repositories;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Invalid search radius")]
    InvalidRadius,
    #[error("The note is too long")]
    InvalidNote,
    #[error("Invalid report status")]
    InvalidStatus,
    #[error("Rating value must be either 1 or -1")]
    InvalidRatingValue,
    #[error("This is not allowed without auth")]
    Unauthorized,
    #[error("The report has expired")]
    Expired,
    #[error("You have already rated this report")]
    AlreadyRated,
    #[error("The report is already a favorite")]
    AlreadyFavorite,
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl From<spotfinder_entities::rating::InvalidRatingValue> for Error {
    fn from(_: spotfinder_entities::rating::InvalidRatingValue) -> Self {
        Self::InvalidRatingValue
    }
}
