use anyhow::anyhow;
use diesel::{
    self,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

use spotfinder_core::{
    entities::*,
    repositories::{self as repo, *},
};

use super::*;

mod favorite;
mod rating;
mod report;

type Result<T> = std::result::Result<T, repo::Error>;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

fn read_only_violation(what: &str) -> repo::Error {
    log::error!("Attempt to {what} through a read-only connection");
    repo::Error::Other(anyhow!("Cannot {what} through a read-only connection"))
}

fn resolve_report_rowid(conn: &mut SqliteConnection, id: &str) -> Result<i64> {
    use schema::reports::dsl;
    schema::reports::table
        .select(dsl::rowid)
        .filter(dsl::id.eq(id))
        .first::<i64>(conn)
        .map_err(from_diesel_err)
}

fn load_report(report: models::Report) -> Result<Report> {
    let models::Report {
        rowid: _,
        id,
        lat,
        lng,
        status,
        note,
        owner_id,
        created_at,
        expires_at,
        rating_total,
        rating_sum,
        is_active,
    } = report;
    let pos = MapPoint::try_from_lat_lng_deg(lat, lng)
        .ok_or_else(|| anyhow!("Invalid position of report {id}: {lat},{lng}"))?;
    let status = ReportStatus::try_from_primitive(status)
        .ok_or_else(|| anyhow!("Invalid status of report {id}: {status}"))?;
    let total = u64::try_from(rating_total)
        .map_err(|_| anyhow!("Invalid rating total of report {id}: {rating_total}"))?;
    Ok(Report {
        id: id.into(),
        pos,
        status,
        note,
        owner: owner_id.map(UserId::from),
        created_at: Timestamp::from_millis(created_at),
        expires_at: Timestamp::from_millis(expires_at),
        ratings: ReportRatings {
            total,
            sum: rating_sum,
        },
        is_active,
    })
}
