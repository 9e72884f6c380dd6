use crate::json::{LiveEvent, RatingResult, Report};

/// Local copy of the reports around the watched position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportCache {
    reports: Vec<Report>,
}

impl ReportCache {
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Replace everything with a fresh snapshot, keeping its order.
    pub fn replace_all(&mut self, reports: Vec<Report>) {
        self.reports = reports;
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }

    /// Known reports are replaced in place. Unknown reports are
    /// added and the list is sorted newest first.
    pub fn upsert(&mut self, report: Report) {
        if let Some(existing) = self.reports.iter_mut().find(|r| r.id == report.id) {
            *existing = report;
            return;
        }
        self.reports.push(report);
        self.reports
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    /// Returns `false` if the report is unknown.
    pub fn update_rating(&mut self, rating: &RatingResult) -> bool {
        let Some(report) = self.reports.iter_mut().find(|r| r.id == rating.id) else {
            return false;
        };
        report.accuracy = rating.accuracy;
        report.total_ratings = rating.total_ratings;
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Report> {
        let index = self.reports.iter().position(|r| r.id == id)?;
        Some(self.reports.remove(index))
    }

    /// Merge a pushed event. Returns `true` if the cache changed.
    pub fn apply(&mut self, event: &LiveEvent) -> bool {
        match event {
            LiveEvent::ReportNew(report) => {
                if self.get(&report.id) == Some(report) {
                    return false;
                }
                self.upsert(report.clone());
                true
            }
            LiveEvent::ReportRated(rating) => self.update_rating(rating),
            LiveEvent::ReportExpired(expired) => self.remove(&expired.id).is_some(),
            LiveEvent::Subscribed(_) | LiveEvent::Error(_) => false,
        }
    }
}
