use crate::util::validate;

mod error;
mod expire_reports;
mod favorites;
mod find_nearby;
mod rate_report;
mod submit_report;

#[cfg(test)]
pub mod tests;

pub use self::{
    error::Error, expire_reports::*, favorites::*, find_nearby::*, rate_report::*,
    submit_report::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*};
}
use self::prelude::*;

/// Limits and defaults of the report lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    /// Lifetime of new reports
    pub ttl: time::Duration,
    pub default_radius: Distance,
    pub max_radius: Distance,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            ttl: time::Duration::minutes(30),
            default_radius: Distance::from_meters(500.0),
            max_radius: Distance::from_meters(50_000.0),
        }
    }
}

pub fn get_report<R: ReportRepo>(repo: &R, id: &str) -> Result<Report> {
    Ok(repo.get_report(id)?)
}

pub fn nearby_query(
    settings: &ReportSettings,
    lat: f64,
    lng: f64,
    radius: Option<f64>,
) -> Result<NearbySubscription> {
    let pos = validate::position(lat, lng)?;
    let radius = validate::radius(radius, settings.default_radius, settings.max_radius)?;
    Ok(NearbySubscription { pos, radius })
}
