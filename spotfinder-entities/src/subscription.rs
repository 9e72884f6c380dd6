use std::fmt;

use crate::geo::*;

/// Maximum offset between a position and the center of its cell.
///
/// Coordinates are rounded to 3 decimals, so the center is at most
/// 0.0005 degrees away in each direction (~56 m north/south, less
/// east/west), i.e. less than 80 m diagonally.
pub const CELL_ROUNDING_SLACK: Distance = Distance::from_meters(80.0);

/// Width of the radius buckets in meters.
pub const RADIUS_BUCKET: u32 = 100;

/// A client's interest in reports around a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySubscription {
    pub pos: MapPoint,
    pub radius: Distance,
}

impl NearbySubscription {
    pub fn cell_key(&self) -> CellKey {
        CellKey::new(self.pos, self.radius)
    }
}

/// Coarse grouping of subscriptions that are close to each other.
///
/// All subscribers with the same rounded position and radius bucket
/// share a cell and receive the same events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    lat_milli: i32,
    lng_milli: i32,
    radius_bucket: u32,
}

impl CellKey {
    pub fn new(pos: MapPoint, radius: Distance) -> Self {
        let (lat, lng) = pos.to_lat_lng_deg();
        let meters = radius.to_meters().max(0.0).ceil() as u32;
        let buckets = meters.div_ceil(RADIUS_BUCKET).max(1);
        Self {
            lat_milli: (lat * 1_000.0).round() as i32,
            lng_milli: (lng * 1_000.0).round() as i32,
            radius_bucket: buckets * RADIUS_BUCKET,
        }
    }

    pub fn center(&self) -> MapPoint {
        MapPoint::from_lat_lng_deg(
            f64::from(self.lat_milli) / 1_000.0,
            f64::from(self.lng_milli) / 1_000.0,
        )
    }

    pub fn radius(&self) -> Distance {
        Distance::from_meters(f64::from(self.radius_bucket))
    }

    /// Conservative test whether an event at `origin` may be within
    /// the radius of any subscription that maps onto this cell.
    ///
    /// Never returns `false` for a point that is inside the radius of
    /// such a subscription.
    pub fn may_contain(&self, origin: MapPoint) -> bool {
        let reach = self.radius().to_meters() + CELL_ROUNDING_SLACK.to_meters();
        MapPoint::distance(self.center(), origin).to_meters() <= reach
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "nearby:{:.3}:{:.3}:{}",
            f64::from(self.lat_milli) / 1_000.0,
            f64::from(self.lng_milli) / 1_000.0,
            self.radius_bucket
        )
    }
}
