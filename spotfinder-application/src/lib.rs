#[macro_use]
extern crate log;

mod expire_reports;
mod favorites;
mod nearby_reports;
mod rate_report;
mod submit_report;

pub mod prelude {
    pub use super::{
        expire_reports::*, favorites::*, nearby_reports::*, rate_report::*, submit_report::*,
    };
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use spotfinder_core::{
    entities::*,
    gateways::broadcast::{ReportEvent, ReportEventGateway},
    repositories::*,
    usecases,
};

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use spotfinder_db_sqlite::Connections;
}
