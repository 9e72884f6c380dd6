use super::*;

pub fn submit_report(
    connections: &sqlite::Connections,
    events: &dyn ReportEventGateway,
    settings: &usecases::ReportSettings,
    new_report: usecases::NewReport,
    owner: Option<UserId>,
) -> Result<Report> {
    let report = {
        let connection = connections.exclusive()?;
        connection.transaction(|conn| {
            usecases::submit_report(conn, new_report, owner, settings.ttl, Timestamp::now())
        })
    }?;
    info!("Created new report {} at {}", report.id, report.pos);
    // The report must not reach subscribers before it is committed
    events.publish(report.pos, ReportEvent::Created(report.clone()));
    Ok(report)
}
