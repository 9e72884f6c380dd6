use super::*;

impl FavoriteRepo for DbReadWrite<'_> {
    fn add_favorite(&self, favorite: &Favorite) -> Result<()> {
        add_favorite(&mut self.conn.borrow_mut(), favorite)
    }
    fn remove_favorite(&self, user: &UserId, report_id: &str) -> Result<()> {
        remove_favorite(&mut self.conn.borrow_mut(), user, report_id)
    }
    fn favorites_of_user(&self, user: &UserId) -> Result<Vec<(Favorite, Report)>> {
        favorites_of_user(&mut self.conn.borrow_mut(), user)
    }
    fn favorite_report_ids_of_user(&self, user: &UserId) -> Result<Vec<Id>> {
        favorite_report_ids_of_user(&mut self.conn.borrow_mut(), user)
    }
}

impl FavoriteRepo for DbConnection<'_> {
    fn add_favorite(&self, favorite: &Favorite) -> Result<()> {
        add_favorite(&mut self.conn.borrow_mut(), favorite)
    }
    fn remove_favorite(&self, user: &UserId, report_id: &str) -> Result<()> {
        remove_favorite(&mut self.conn.borrow_mut(), user, report_id)
    }
    fn favorites_of_user(&self, user: &UserId) -> Result<Vec<(Favorite, Report)>> {
        favorites_of_user(&mut self.conn.borrow_mut(), user)
    }
    fn favorite_report_ids_of_user(&self, user: &UserId) -> Result<Vec<Id>> {
        favorite_report_ids_of_user(&mut self.conn.borrow_mut(), user)
    }
}

impl FavoriteRepo for DbReadOnly<'_> {
    fn add_favorite(&self, _favorite: &Favorite) -> Result<()> {
        Err(read_only_violation("add a favorite"))
    }
    fn remove_favorite(&self, _user: &UserId, _report_id: &str) -> Result<()> {
        Err(read_only_violation("remove a favorite"))
    }
    fn favorites_of_user(&self, user: &UserId) -> Result<Vec<(Favorite, Report)>> {
        favorites_of_user(&mut self.conn.borrow_mut(), user)
    }
    fn favorite_report_ids_of_user(&self, user: &UserId) -> Result<Vec<Id>> {
        favorite_report_ids_of_user(&mut self.conn.borrow_mut(), user)
    }
}

fn add_favorite(conn: &mut SqliteConnection, favorite: &Favorite) -> Result<()> {
    let report_rowid = resolve_report_rowid(conn, favorite.report_id.as_str())?;
    let new_favorite = models::Favorite {
        user_id: favorite.user.as_str().to_owned(),
        report_rowid,
        created_at: favorite.created_at.as_millis(),
    };
    diesel::insert_into(schema::favorites::table)
        .values(&new_favorite)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn remove_favorite(conn: &mut SqliteConnection, user: &UserId, report_id: &str) -> Result<()> {
    use schema::favorites::dsl;
    let report_rowid = resolve_report_rowid(conn, report_id)?;
    let count = diesel::delete(
        schema::favorites::table
            .filter(dsl::user_id.eq(user.as_str()))
            .filter(dsl::report_rowid.eq(report_rowid)),
    )
    .execute(conn)
    .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    debug_assert_eq!(1, count);
    Ok(())
}

fn favorites_of_user(conn: &mut SqliteConnection, user: &UserId) -> Result<Vec<(Favorite, Report)>> {
    use schema::favorites::dsl;
    schema::favorites::table
        .inner_join(schema::reports::table)
        .filter(dsl::user_id.eq(user.as_str()))
        .order_by(dsl::created_at.desc())
        .select((
            schema::favorites::all_columns,
            schema::reports::all_columns,
        ))
        .load::<(models::Favorite, models::Report)>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|(favorite, report)| -> Result<_> {
            let report = load_report(report)?;
            let favorite = Favorite {
                user: favorite.user_id.into(),
                report_id: report.id.clone(),
                created_at: Timestamp::from_millis(favorite.created_at),
            };
            Ok((favorite, report))
        })
        .collect()
}

fn favorite_report_ids_of_user(conn: &mut SqliteConnection, user: &UserId) -> Result<Vec<Id>> {
    use schema::{favorites::dsl, reports::dsl as r_dsl};
    Ok(schema::favorites::table
        .inner_join(schema::reports::table)
        .filter(dsl::user_id.eq(user.as_str()))
        .order_by(dsl::created_at.desc())
        .select(r_dsl::id)
        .load::<String>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Id::from)
        .collect())
}
