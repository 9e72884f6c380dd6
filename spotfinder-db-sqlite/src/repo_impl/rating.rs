use super::*;

impl RatingRepo for DbReadWrite<'_> {
    fn add_rating(&self, rating: &Rating) -> Result<ReportRatings> {
        add_rating(&mut self.conn.borrow_mut(), rating)
    }
}

impl RatingRepo for DbConnection<'_> {
    fn add_rating(&self, rating: &Rating) -> Result<ReportRatings> {
        add_rating(&mut self.conn.borrow_mut(), rating)
    }
}

impl RatingRepo for DbReadOnly<'_> {
    fn add_rating(&self, _rating: &Rating) -> Result<ReportRatings> {
        Err(read_only_violation("add a rating"))
    }
}

// Must be invoked within a transaction: the insert and the
// update of the aggregate either both succeed or both fail.
fn add_rating(conn: &mut SqliteConnection, rating: &Rating) -> Result<ReportRatings> {
    use schema::{report_ratings::dsl as r_dsl, reports::dsl};
    let report_rowid = resolve_report_rowid(conn, rating.report_id.as_str())?;
    let already_rated = schema::report_ratings::table
        .select(r_dsl::rowid)
        .filter(r_dsl::report_rowid.eq(report_rowid))
        .filter(r_dsl::rater_id.eq(rating.rater.as_str()))
        .first::<i64>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .is_some();
    if already_rated {
        return Err(repo::Error::AlreadyExists);
    }
    let value = rating.value.to_i8();
    let new_rating = models::NewReportRating {
        id: rating.id.as_str(),
        report_rowid,
        rater_id: rating.rater.as_str(),
        value: i16::from(value),
        created_at: rating.created_at.as_millis(),
    };
    diesel::insert_into(schema::report_ratings::table)
        .values(&new_rating)
        .execute(conn)
        .map_err(from_diesel_err)?;
    diesel::update(schema::reports::table.filter(dsl::rowid.eq(report_rowid)))
        .set((
            dsl::rating_total.eq(dsl::rating_total + 1),
            dsl::rating_sum.eq(dsl::rating_sum + i64::from(value)),
        ))
        .execute(conn)
        .map_err(from_diesel_err)?;
    let (total, sum) = schema::reports::table
        .select((dsl::rating_total, dsl::rating_sum))
        .filter(dsl::rowid.eq(report_rowid))
        .first::<(i64, i64)>(conn)
        .map_err(from_diesel_err)?;
    let total = u64::try_from(total).map_err(|err| anyhow!(err))?;
    Ok(ReportRatings { total, sum })
}
