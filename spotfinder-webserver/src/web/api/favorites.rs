use super::*;

#[post("/reports/<id>/favorite")]
pub fn post_favorite(connections: &State<Connections>, auth: Auth, id: &str) -> Result<()> {
    let user = auth.user_id()?;
    flows::add_favorite(connections, user, id)?;
    Ok(Json(()))
}

#[delete("/reports/<id>/favorite")]
pub fn delete_favorite(connections: &State<Connections>, auth: Auth, id: &str) -> Result<()> {
    let user = auth.user_id()?;
    flows::remove_favorite(connections, user, id)?;
    Ok(Json(()))
}

/// Favorite reports, most recently added first
#[get("/favorites")]
pub fn get_favorites(connections: &State<Connections>, auth: Auth) -> Result<Vec<json::Report>> {
    let user = auth.user_id()?;
    let now = Timestamp::now();
    let favorites = flows::favorites_of_user(connections, user)?
        .into_iter()
        .map(|(_, report)| to_json::report(report, now))
        .collect();
    Ok(Json(favorites))
}

#[get("/favorites/ids")]
pub fn get_favorite_ids(connections: &State<Connections>, auth: Auth) -> Result<Vec<String>> {
    let user = auth.user_id()?;
    let ids = flows::favorite_ids_of_user(connections, user)?;
    Ok(Json(ids.into_iter().map(String::from).collect()))
}
