#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;

#[derive(Insertable)]
#[diesel(table_name = reports)]
pub struct NewReport<'a> {
    pub id: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub status: i16,
    pub note: Option<&'a str>,
    pub owner_id: Option<&'a str>,
    pub created_at: i64,
    pub expires_at: i64,
    pub rating_total: i64,
    pub rating_sum: i64,
    pub is_active: bool,
}

#[derive(Queryable)]
pub struct Report {
    pub rowid: i64,
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub status: i16,
    pub note: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
    pub rating_total: i64,
    pub rating_sum: i64,
    pub is_active: bool,
}

#[derive(Insertable)]
#[diesel(table_name = report_ratings)]
pub struct NewReportRating<'a> {
    pub id: &'a str,
    pub report_rowid: i64,
    pub rater_id: &'a str,
    pub value: i16,
    pub created_at: i64,
}

#[derive(Insertable, Queryable)]
#[diesel(table_name = favorites)]
pub struct Favorite {
    pub user_id: String,
    pub report_rowid: i64,
    pub created_at: i64,
}
