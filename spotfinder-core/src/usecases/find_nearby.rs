use super::prelude::*;
use std::cmp::Ordering;

/// Active reports within the radius, nearest first.
///
/// Reports at the same distance are ordered from newest to oldest.
/// Expired reports are excluded even if they have not been swept yet.
pub fn find_nearby<R: ReportRepo>(
    repo: &R,
    query: &NearbySubscription,
    now: Timestamp,
) -> Result<Vec<(Report, Distance)>> {
    let NearbySubscription { pos, radius } = *query;
    let bbox = MapBbox::centered_at(pos, radius);
    let mut nearby: Vec<_> = repo
        .find_live_reports_in_bbox(&bbox, now)?
        .into_iter()
        .filter(|r| r.is_live_at(now))
        .map(|r| {
            let distance = MapPoint::distance(pos, r.pos);
            (r, distance)
        })
        .filter(|(_, d)| *d <= radius)
        .collect();
    nearby.sort_by(|(r1, d1), (r2, d2)| {
        d1.partial_cmp(d2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| r2.created_at.cmp(&r1.created_at))
    });
    Ok(nearby)
}
