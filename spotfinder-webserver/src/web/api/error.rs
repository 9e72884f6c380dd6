use super::json_error_response;
use anyhow::anyhow;
use rocket::{
    self,
    http::Status,
    response::{self, Responder},
    serde::json::Error as JsonError,
};
use spotfinder_application::error::{AppError, BError};
pub use spotfinder_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("{0}")]
    OtherWithStatus(#[source] anyhow::Error, Status),
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Self::App(AppError::Business(BError::Parameter(err))) => match err {
                ParameterError::Unauthorized => Status::Unauthorized,
                ParameterError::Expired => Status::Gone,
                ParameterError::AlreadyRated | ParameterError::AlreadyFavorite => Status::Conflict,
                ParameterError::Repo(_) => Status::InternalServerError,
                _ => Status::BadRequest,
            },
            Self::App(AppError::Business(BError::Repo(err))) => match err {
                RepoError::NotFound => Status::NotFound,
                RepoError::AlreadyExists => Status::Conflict,
                _ => Status::InternalServerError,
            },
            Self::App(_) => Status::InternalServerError,
            Self::OtherWithStatus(_, status) => *status,
        }
    }
}

impl From<JsonError<'_>> for Error {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::Io(err) => Self::OtherWithStatus(anyhow!(err), Status::BadRequest),
            JsonError::Parse(_str, err) => Self::OtherWithStatus(anyhow!(err), Status::BadRequest),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &rocket::Request) -> response::Result<'o> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("Error: {self}");
            // Internals are not exposed
            return json_error_response(req, &"Internal server error", status);
        }
        debug!("Request failed with status {}: {self}", status.code);
        json_error_response(req, &self, status)
    }
}

impl From<RepoError> for Error {
    fn from(err: RepoError) -> Self {
        AppError::from(err).into()
    }
}

impl From<ParameterError> for Error {
    fn from(err: ParameterError) -> Self {
        Self::App(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_errors_to_http_status_codes() {
        let status = |err: Error| err.status().code;
        assert_eq!(status(ParameterError::InvalidPosition.into()), 400);
        assert_eq!(status(ParameterError::InvalidRatingValue.into()), 400);
        assert_eq!(status(ParameterError::Unauthorized.into()), 401);
        assert_eq!(status(RepoError::NotFound.into()), 404);
        assert_eq!(status(ParameterError::Repo(RepoError::NotFound).into()), 404);
        assert_eq!(status(ParameterError::AlreadyRated.into()), 409);
        assert_eq!(status(ParameterError::AlreadyFavorite.into()), 409);
        assert_eq!(status(ParameterError::Expired.into()), 410);
        assert_eq!(status(RepoError::Other(anyhow!("disk full")).into()), 500);
        assert_eq!(status(AppError::Other(anyhow!("pool exhausted")).into()), 500);
    }
}
