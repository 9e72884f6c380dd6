use super::prelude::*;

pub fn expire_reports<R: ReportRepo>(repo: &R, now: Timestamp) -> Result<Vec<Report>> {
    let expired = repo.expire_reports(now)?;
    if !expired.is_empty() {
        log::info!("Expired {} report(s)", expired.len());
    }
    Ok(expired)
}
