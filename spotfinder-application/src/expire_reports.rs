use super::*;

/// Deactivate all overdue reports and announce them.
pub fn expire_reports(
    connections: &sqlite::Connections,
    events: &dyn ReportEventGateway,
) -> Result<Vec<Report>> {
    expire_reports_at(connections, events, Timestamp::now())
}

pub(crate) fn expire_reports_at(
    connections: &sqlite::Connections,
    events: &dyn ReportEventGateway,
    now: Timestamp,
) -> Result<Vec<Report>> {
    let expired = {
        let connection = connections.exclusive()?;
        connection.transaction(|conn| usecases::expire_reports(conn, now))
    }?;
    for report in &expired {
        debug!("Report {} expired", report.id);
        events.publish(report.pos, ReportEvent::expired(report));
    }
    Ok(expired)
}
