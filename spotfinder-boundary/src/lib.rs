use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Report {
    pub id            : String,
    pub lat           : f64,
    pub lng           : f64,
    pub status        : ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note          : Option<String>,
    /// Milliseconds since the Unix epoch
    pub created_at    : i64,
    /// Milliseconds since the Unix epoch
    pub expires_at    : i64,
    pub accuracy      : f64,
    pub total_ratings : u64,
    pub is_active     : bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_ago   : Option<String>,
    /// Meters from the queried position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance      : Option<f64>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq, Eq))]
pub enum ReportStatus {
    Available,
    Taken,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NewReport {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
    /// Validated by the server, unknown values are rejected.
    pub status: String,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A single vote on the accuracy of a report.
///
/// Accepts `{"value": 1}` / `{"value": -1}` and the
/// legacy form `{"isUpvote": true}`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub enum RateReport {
    Value {
        value: i64,
    },
    Upvote {
        #[serde(rename = "isUpvote")]
        is_upvote: bool,
    },
}

impl RateReport {
    pub const fn up() -> Self {
        Self::Value { value: 1 }
    }

    pub const fn down() -> Self {
        Self::Value { value: -1 }
    }

    pub const fn value(&self) -> i64 {
        match self {
            Self::Value { value } => *value,
            Self::Upvote { is_upvote: true } => 1,
            Self::Upvote { is_upvote: false } => -1,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct RatingResult {
    pub id: String,
    pub accuracy: f64,
    pub total_ratings: u64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ExpiredReport {
    pub id: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Subscribed {
    pub cell: String,
}

/// Server to client messages on the live channel.
#[derive(Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub enum LiveEvent {
    #[serde(rename = "report:new")]
    ReportNew(Report),
    #[serde(rename = "report:rated")]
    ReportRated(RatingResult),
    #[serde(rename = "report:expired")]
    ReportExpired(ExpiredReport),
    #[serde(rename = "subscribed")]
    Subscribed(Subscribed),
    #[serde(rename = "error")]
    Error(Error),
}

/// Client to server messages on the live channel.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub enum LiveCommand {
    #[serde(alias = "parking:nearby")]
    WatchNearby {
        lat: f64,
        lng: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
    },
    #[serde(alias = "parking:unsubscribe")]
    Unwatch,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, thiserror::Error))]
#[cfg_attr(feature = "extra-derive", error("{message} ({http_status})"))]
pub struct Error {
    pub http_status: u16,
    pub message: String,
}
