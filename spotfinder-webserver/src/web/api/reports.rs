use super::*;

#[get("/reports/nearby?<lat>&<lng>&<radius>")]
pub fn get_nearby_reports(
    connections: &State<Connections>,
    hub: &State<BroadcastHub>,
    cfg: &State<Cfg>,
    lat: f64,
    lng: f64,
    radius: Option<f64>,
) -> Result<Vec<json::Report>> {
    let query = usecases::nearby_query(&cfg.reports, lat, lng, radius)?;
    let reports = flows::nearby_reports(connections, hub.inner(), &query)?;
    let now = Timestamp::now();
    Ok(Json(
        reports
            .into_iter()
            .map(|(report, distance)| to_json::nearby_report(report, distance, now))
            .collect(),
    ))
}

#[get("/reports/<id>")]
pub fn get_report(connections: &State<Connections>, id: &str) -> Result<json::Report> {
    let report = flows::get_report(connections, id)?;
    Ok(Json(to_json::report(report, Timestamp::now())))
}

#[post("/reports", data = "<body>")]
pub fn post_report(
    connections: &State<Connections>,
    hub: &State<BroadcastHub>,
    cfg: &State<Cfg>,
    auth: Auth,
    body: JsonResult<json::NewReport>,
) -> result::Result<(Status, Json<json::Report>), ApiError> {
    let new_report = from_json::new_report(body?.into_inner());
    let owner = auth.optional_user_id().cloned();
    if owner.is_none() && !cfg.anonymous_reports {
        return Err(usecases::Error::Unauthorized.into());
    }
    let report = flows::submit_report(connections, hub.inner(), &cfg.reports, new_report, owner)?;
    Ok((
        Status::Created,
        Json(to_json::report(report, Timestamp::now())),
    ))
}

#[put("/reports/<id>/rate", data = "<body>")]
pub fn put_report_rating(
    connections: &State<Connections>,
    hub: &State<BroadcastHub>,
    auth: Auth,
    id: &str,
    body: JsonResult<json::RateReport>,
) -> Result<json::RatingResult> {
    let rater = auth.user_id()?;
    let rating = from_json::new_rating(id.to_owned(), body?.into_inner());
    let report = flows::rate_report(connections, hub.inner(), rater, rating)?;
    Ok(Json(json::RatingResult::from(&report)))
}
