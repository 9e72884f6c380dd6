use super::*;

pub fn add_favorite(
    connections: &sqlite::Connections,
    user: &UserId,
    report_id: &str,
) -> Result<Favorite> {
    let connection = connections.exclusive()?;
    Ok(connection
        .transaction(|conn| usecases::add_favorite(conn, user, report_id, Timestamp::now()))?)
}

pub fn remove_favorite(
    connections: &sqlite::Connections,
    user: &UserId,
    report_id: &str,
) -> Result<()> {
    let connection = connections.exclusive()?;
    Ok(connection.transaction(|conn| usecases::remove_favorite(conn, user, report_id))?)
}

pub fn favorites_of_user(
    connections: &sqlite::Connections,
    user: &UserId,
) -> Result<Vec<(Favorite, Report)>> {
    let connection = connections.shared()?;
    Ok(usecases::favorites_of_user(&connection, user)?)
}

pub fn favorite_ids_of_user(connections: &sqlite::Connections, user: &UserId) -> Result<Vec<Id>> {
    let connection = connections.shared()?;
    Ok(usecases::favorite_ids_of_user(&connection, user)?)
}
