use std::{fmt::Display, result};

use rocket::{
    self, delete, get,
    http::Status,
    post, put,
    response::{self, Responder},
    routes,
    serde::json::{Error as JsonError, Json},
    Route, State,
};
use spotfinder_application::prelude as flows;
use spotfinder_boundary::Error as JsonErrorResponse;
use spotfinder_core::{entities::*, usecases};
use spotfinder_db_sqlite::Connections;
use spotfinder_gateways::hub::BroadcastHub;

use super::{guards::*, Cfg};
use crate::adapters::json::{self, from_json, to_json};

mod error;
mod favorites;
mod reports;
mod util;

pub use self::error::Error as ApiError;

#[cfg(test)]
pub mod tests;

type Result<T> = result::Result<Json<T>, ApiError>;
type JsonResult<'a, T> = result::Result<Json<T>, JsonError<'a>>;

pub fn routes() -> Vec<Route> {
    routes![
        // ---   reports   --- //
        reports::get_nearby_reports,
        reports::get_report,
        reports::post_report,
        reports::put_report_rating,
        // ---   favorites   --- //
        favorites::post_favorite,
        favorites::delete_favorite,
        favorites::get_favorites,
        favorites::get_favorite_ids,
        // ---   live   --- //
        super::live::live,
        // ---   util   --- //
        util::get_version,
    ]
}

fn json_error_response<'r, 'o: 'r, E: Display>(
    req: &'r rocket::Request<'_>,
    err: &E,
    status: Status,
) -> response::Result<'o> {
    let message = err.to_string();
    let boundary_error = JsonErrorResponse {
        http_status: status.code,
        message,
    };
    Json(boundary_error).respond_to(req).map(|mut res| {
        res.set_status(status);
        res
    })
}
