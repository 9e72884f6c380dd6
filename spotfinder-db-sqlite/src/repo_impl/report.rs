use super::*;

impl ReportRepo for DbReadWrite<'_> {
    fn create_report(&self, report: &Report) -> Result<()> {
        create_report(&mut self.conn.borrow_mut(), report)
    }
    fn get_report(&self, id: &str) -> Result<Report> {
        get_report(&mut self.conn.borrow_mut(), id)
    }
    fn find_live_reports_in_bbox(&self, bbox: &MapBbox, now: Timestamp) -> Result<Vec<Report>> {
        find_live_reports_in_bbox(&mut self.conn.borrow_mut(), bbox, now)
    }
    fn expire_reports(&self, now: Timestamp) -> Result<Vec<Report>> {
        expire_reports(&mut self.conn.borrow_mut(), now)
    }
}

impl ReportRepo for DbConnection<'_> {
    fn create_report(&self, report: &Report) -> Result<()> {
        create_report(&mut self.conn.borrow_mut(), report)
    }
    fn get_report(&self, id: &str) -> Result<Report> {
        get_report(&mut self.conn.borrow_mut(), id)
    }
    fn find_live_reports_in_bbox(&self, bbox: &MapBbox, now: Timestamp) -> Result<Vec<Report>> {
        find_live_reports_in_bbox(&mut self.conn.borrow_mut(), bbox, now)
    }
    fn expire_reports(&self, now: Timestamp) -> Result<Vec<Report>> {
        expire_reports(&mut self.conn.borrow_mut(), now)
    }
}

impl ReportRepo for DbReadOnly<'_> {
    fn create_report(&self, _report: &Report) -> Result<()> {
        Err(read_only_violation("create a report"))
    }
    fn get_report(&self, id: &str) -> Result<Report> {
        get_report(&mut self.conn.borrow_mut(), id)
    }
    fn find_live_reports_in_bbox(&self, bbox: &MapBbox, now: Timestamp) -> Result<Vec<Report>> {
        find_live_reports_in_bbox(&mut self.conn.borrow_mut(), bbox, now)
    }
    fn expire_reports(&self, _now: Timestamp) -> Result<Vec<Report>> {
        Err(read_only_violation("expire reports"))
    }
}

fn create_report(conn: &mut SqliteConnection, report: &Report) -> Result<()> {
    let (lat, lng) = report.pos.to_lat_lng_deg();
    let total = i64::try_from(report.ratings.total).map_err(|err| anyhow!(err))?;
    let new_report = models::NewReport {
        id: report.id.as_str(),
        lat,
        lng,
        status: report.status.to_primitive(),
        note: report.note.as_deref(),
        owner_id: report.owner.as_ref().map(UserId::as_str),
        created_at: report.created_at.as_millis(),
        expires_at: report.expires_at.as_millis(),
        rating_total: total,
        rating_sum: report.ratings.sum,
        is_active: report.is_active,
    };
    let _count = diesel::insert_into(schema::reports::table)
        .values(&new_report)
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(1, _count);
    Ok(())
}

fn get_report(conn: &mut SqliteConnection, id: &str) -> Result<Report> {
    use schema::reports::dsl;
    let report = schema::reports::table
        .filter(dsl::id.eq(id))
        .first::<models::Report>(conn)
        .map_err(from_diesel_err)?;
    load_report(report)
}

fn find_live_reports_in_bbox(
    conn: &mut SqliteConnection,
    bbox: &MapBbox,
    now: Timestamp,
) -> Result<Vec<Report>> {
    use schema::reports::dsl;
    let (south, west) = bbox.south_west().to_lat_lng_deg();
    let (north, east) = bbox.north_east().to_lat_lng_deg();
    let mut query = schema::reports::table
        .filter(dsl::is_active.eq(true))
        .filter(dsl::expires_at.gt(now.as_millis()))
        .filter(dsl::lat.between(south, north))
        .into_boxed();
    if bbox.wraps_antimeridian() {
        query = query.filter(dsl::lng.ge(west).or(dsl::lng.le(east)));
    } else {
        query = query.filter(dsl::lng.between(west, east));
    }
    query
        .load::<models::Report>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_report)
        .collect()
}

fn expire_reports(conn: &mut SqliteConnection, now: Timestamp) -> Result<Vec<Report>> {
    use schema::reports::dsl;
    let overdue = schema::reports::table
        .filter(dsl::is_active.eq(true))
        .filter(dsl::expires_at.le(now.as_millis()))
        .load::<models::Report>(conn)
        .map_err(from_diesel_err)?;
    if overdue.is_empty() {
        return Ok(vec![]);
    }
    let rowids: Vec<_> = overdue.iter().map(|r| r.rowid).collect();
    let expected = rowids.len();
    let count = diesel::update(schema::reports::table.filter(dsl::rowid.eq_any(rowids)))
        .set(dsl::is_active.eq(false))
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(count, expected);
    overdue
        .into_iter()
        .map(|r| {
            load_report(r).map(|mut report| {
                report.is_active = false;
                report
            })
        })
        .collect()
}
