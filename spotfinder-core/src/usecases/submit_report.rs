use super::prelude::*;
use crate::util::validate;

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct NewReport {
    pub lat    : f64,
    pub lng    : f64,
    pub status : String,
    pub note   : Option<String>,
}

pub fn prepare_new_report(
    new_report: NewReport,
    owner: Option<UserId>,
    ttl: time::Duration,
    now: Timestamp,
) -> Result<Report> {
    let NewReport {
        lat,
        lng,
        status,
        note,
    } = new_report;
    let pos = validate::position(lat, lng)?;
    let status = validate::status(&status)?;
    let note = validate::note(note)?;
    Ok(Report {
        id: Id::new(),
        pos,
        status,
        note,
        owner,
        created_at: now,
        expires_at: now + ttl,
        ratings: ReportRatings::default(),
        is_active: true,
    })
}

pub fn submit_report<R: ReportRepo>(
    repo: &R,
    new_report: NewReport,
    owner: Option<UserId>,
    ttl: time::Duration,
    now: Timestamp,
) -> Result<Report> {
    let report = prepare_new_report(new_report, owner, ttl, now)?;
    log::debug!("Storing new report {} at {}", report.id, report.pos);
    repo.create_report(&report)?;
    Ok(report)
}
