use super::*;

pub fn rate_report(
    connections: &sqlite::Connections,
    events: &dyn ReportEventGateway,
    rater: &UserId,
    rating: usecases::NewRating,
) -> Result<Report> {
    let report = {
        let connection = connections.exclusive()?;
        connection.transaction(|conn| usecases::rate_report(conn, rater, rating, Timestamp::now()))
    }
    .inspect_err(|err| {
        debug!("Rating rejected: {err}");
    })?;
    events.publish(report.pos, ReportEvent::rated(&report));
    Ok(report)
}
