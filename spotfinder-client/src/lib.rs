use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

mod api;
mod backoff;
mod cache;
mod credentials;
mod favorites;
mod live;
mod sync;

pub use self::{api::*, backoff::*, cache::*, credentials::*, favorites::*, live::*, sync::*};

pub use spotfinder_boundary as json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not authorized")]
    Unauthorized,

    #[error("Expired: {0}")]
    Expired(String),

    #[error("Connection problem: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decoding(String),

    #[error("Another operation on {0} is still pending")]
    Busy(String),
}

impl Error {
    /// Only transport failures are worth another attempt.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The server refuses a second vote by the same user.
    ///
    /// Rating is the only operation that responds with
    /// a conflict for an existing report.
    pub const fn is_already_rated(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => Self::InvalidInput(message),
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            410 => Self::Expired(message),
            _ => Self::Transport(format!("{message} ({status})")),
        }
    }
}

impl From<json::Error> for Error {
    fn from(err: json::Error) -> Self {
        let json::Error {
            http_status,
            message,
        } = err;
        Self::from_status(http_status, message)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decoding(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decoding(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

pub async fn into_json<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    // ensure we've got 2xx status
    if response.status().is_success() {
        return Ok(response.json().await?);
    }
    let status = response.status().as_u16();
    let body = response.text().await?;
    match serde_json::from_str::<json::Error>(&body) {
        Ok(err) => Err(err.into()),
        Err(_) => Err(Error::from_status(status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_api_errors() {
        let err = |status| {
            Error::from(json::Error {
                http_status: status,
                message: "msg".into(),
            })
        };
        assert_eq!(err(400), Error::InvalidInput("msg".into()));
        assert_eq!(err(401), Error::Unauthorized);
        assert_eq!(err(404), Error::NotFound("msg".into()));
        assert!(err(409).is_already_rated());
        assert_eq!(err(410), Error::Expired("msg".into()));
        assert!(err(500).is_retryable());
        assert!(!err(400).is_retryable());
        assert!(!Error::Busy("r1".into()).is_retryable());
    }
}
