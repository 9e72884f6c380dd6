use super::*;

/// Active reports around the queried position, nearest first.
///
/// Overdue reports are swept (and announced) before querying.
pub fn nearby_reports(
    connections: &sqlite::Connections,
    events: &dyn ReportEventGateway,
    query: &NearbySubscription,
) -> Result<Vec<(Report, Distance)>> {
    let now = Timestamp::now();
    expire_reports::expire_reports_at(connections, events, now)?;
    let connection = connections.shared()?;
    Ok(usecases::find_nearby(&connection, query, now)?)
}

pub fn get_report(connections: &sqlite::Connections, id: &str) -> Result<Report> {
    let connection = connections.shared()?;
    Ok(usecases::get_report(&connection, id)?)
}
