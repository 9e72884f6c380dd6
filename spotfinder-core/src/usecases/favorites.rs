use super::prelude::*;
use crate::repositories::Error as RepoError;

pub fn add_favorite<R>(repo: &R, user: &UserId, report_id: &str, now: Timestamp) -> Result<Favorite>
where
    R: ReportRepo + FavoriteRepo,
{
    let report = repo.get_report(report_id)?;
    let favorite = Favorite {
        user: user.clone(),
        report_id: report.id,
        created_at: now,
    };
    repo.add_favorite(&favorite).map_err(|err| match err {
        RepoError::AlreadyExists => Error::AlreadyFavorite,
        err => err.into(),
    })?;
    Ok(favorite)
}

pub fn remove_favorite<R: FavoriteRepo>(repo: &R, user: &UserId, report_id: &str) -> Result<()> {
    Ok(repo.remove_favorite(user, report_id)?)
}

pub fn favorites_of_user<R: FavoriteRepo>(repo: &R, user: &UserId) -> Result<Vec<(Favorite, Report)>> {
    Ok(repo.favorites_of_user(user)?)
}

pub fn favorite_ids_of_user<R: FavoriteRepo>(repo: &R, user: &UserId) -> Result<Vec<Id>> {
    Ok(repo.favorite_report_ids_of_user(user)?)
}
