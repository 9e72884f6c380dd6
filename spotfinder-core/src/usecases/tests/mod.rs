use super::prelude::*;
use std::cell::RefCell;

type RepoResult<T> = std::result::Result<T, RepoError>;
use crate::repositories::Error as RepoError;

#[derive(Default)]
pub struct MockDb {
    pub reports: RefCell<Vec<Report>>,
    pub ratings: RefCell<Vec<Rating>>,
    pub favorites: RefCell<Vec<Favorite>>,
}

impl MockDb {
    pub fn insert(&self, report: Report) {
        self.reports.borrow_mut().push(report);
    }
}

impl ReportRepo for MockDb {
    fn create_report(&self, report: &Report) -> RepoResult<()> {
        if self.reports.borrow().iter().any(|r| r.id == report.id) {
            return Err(RepoError::AlreadyExists);
        }
        self.insert(report.clone());
        Ok(())
    }

    fn get_report(&self, id: &str) -> RepoResult<Report> {
        self.reports
            .borrow()
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn find_live_reports_in_bbox(&self, bbox: &MapBbox, now: Timestamp) -> RepoResult<Vec<Report>> {
        Ok(self
            .reports
            .borrow()
            .iter()
            .filter(|r| r.is_live_at(now) && bbox.contains_point(r.pos))
            .cloned()
            .collect())
    }

    fn expire_reports(&self, now: Timestamp) -> RepoResult<Vec<Report>> {
        let mut expired = vec![];
        for r in self.reports.borrow_mut().iter_mut() {
            if r.is_active && r.expires_at <= now {
                r.is_active = false;
                expired.push(r.clone());
            }
        }
        Ok(expired)
    }
}

impl RatingRepo for MockDb {
    fn add_rating(&self, rating: &Rating) -> RepoResult<ReportRatings> {
        if self
            .ratings
            .borrow()
            .iter()
            .any(|r| r.report_id == rating.report_id && r.rater == rating.rater)
        {
            return Err(RepoError::AlreadyExists);
        }
        let mut reports = self.reports.borrow_mut();
        let report = reports
            .iter_mut()
            .find(|r| r.id == rating.report_id)
            .ok_or(RepoError::NotFound)?;
        report.ratings.add(rating.value);
        self.ratings.borrow_mut().push(rating.clone());
        Ok(report.ratings)
    }
}

impl FavoriteRepo for MockDb {
    fn add_favorite(&self, favorite: &Favorite) -> RepoResult<()> {
        let mut favorites = self.favorites.borrow_mut();
        if favorites
            .iter()
            .any(|f| f.user == favorite.user && f.report_id == favorite.report_id)
        {
            return Err(RepoError::AlreadyExists);
        }
        favorites.push(favorite.clone());
        Ok(())
    }

    fn remove_favorite(&self, user: &UserId, report_id: &str) -> RepoResult<()> {
        let mut favorites = self.favorites.borrow_mut();
        let len = favorites.len();
        favorites.retain(|f| !(&f.user == user && f.report_id.as_str() == report_id));
        if favorites.len() == len {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn favorites_of_user(&self, user: &UserId) -> RepoResult<Vec<(Favorite, Report)>> {
        let mut favorites: Vec<_> = self
            .favorites
            .borrow()
            .iter()
            .filter(|f| &f.user == user)
            .map(|f| -> RepoResult<_> { Ok((f.clone(), self.get_report(f.report_id.as_str())?)) })
            .collect::<RepoResult<_>>()?;
        favorites.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    fn favorite_report_ids_of_user(&self, user: &UserId) -> RepoResult<Vec<Id>> {
        Ok(self
            .favorites_of_user(user)?
            .into_iter()
            .map(|(f, _)| f.report_id)
            .collect())
    }
}
