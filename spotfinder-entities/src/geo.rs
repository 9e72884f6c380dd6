use std::{fmt, str::FromStr};

use thiserror::Error;

pub type RawCoord = i32;

/// Fixed-point resolution: one raw unit equals one micro degree (~0.11 m).
const RAW_UNITS_PER_DEG: f64 = 1_000_000.0;

macro_rules! geo_coord {
    ($name:ident, $deg_max:expr) => {
        /// Compact fixed-point integer representation of a geographical coordinate.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(RawCoord);

        impl $name {
            pub const DEG_MAX: f64 = $deg_max;
            pub const DEG_MIN: f64 = -$deg_max;

            pub const fn to_raw(self) -> RawCoord {
                self.0
            }

            pub const fn from_raw(raw: RawCoord) -> Self {
                Self(raw)
            }

            pub fn to_deg(self) -> f64 {
                f64::from(self.0) / RAW_UNITS_PER_DEG
            }

            pub fn to_rad(self) -> f64 {
                self.to_deg().to_radians()
            }

            pub fn from_deg<T: Into<f64>>(deg: T) -> Self {
                let deg = deg.into();
                debug_assert!(deg >= Self::DEG_MIN);
                debug_assert!(deg <= Self::DEG_MAX);
                Self((deg * RAW_UNITS_PER_DEG).round() as RawCoord)
            }

            pub fn try_from_deg<T: Into<f64>>(deg: T) -> Option<Self> {
                let deg = deg.into();
                // NaN fails both comparisons
                if deg >= Self::DEG_MIN && deg <= Self::DEG_MAX {
                    Some(Self::from_deg(deg))
                } else {
                    None
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.to_deg())
            }
        }
    };
}

geo_coord!(LatCoord, 90.0);
geo_coord!(LngCoord, 180.0);

/// A geographical position on the surface of the earth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapPoint {
    lat: LatCoord,
    lng: LngCoord,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapPointParseError {
    #[error("Invalid latitude: {0}")]
    Latitude(String),
    #[error("Invalid longitude: {0}")]
    Longitude(String),
    #[error("Expected '<lat>,<lng>'")]
    Format,
}

impl MapPoint {
    pub const fn new(lat: LatCoord, lng: LngCoord) -> Self {
        Self { lat, lng }
    }

    pub const fn lat(self) -> LatCoord {
        self.lat
    }

    pub const fn lng(self) -> LngCoord {
        self.lng
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat.to_deg(), self.lng.to_deg())
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.lat.to_rad(), self.lng.to_rad())
    }

    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        Self::new(LatCoord::from_deg(lat), LngCoord::from_deg(lng))
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        match (LatCoord::try_from_deg(lat), LngCoord::try_from_deg(lng)) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }

    /// Great-circle distance using the haversine formula.
    pub fn distance(p1: MapPoint, p2: MapPoint) -> Distance {
        let (lat1, lng1) = p1.to_lat_lng_rad();
        let (lat2, lng2) = p2.to_lat_lng_rad();
        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        Distance::from_meters(MEAN_EARTH_RADIUS.to_meters() * c)
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = MapPointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s.split_once(',').ok_or(MapPointParseError::Format)?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(LatCoord::try_from_deg)
            .ok_or_else(|| MapPointParseError::Latitude(lat.to_owned()))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(LngCoord::try_from_deg)
            .ok_or_else(|| MapPointParseError::Longitude(lng.to_owned()))?;
        Ok(Self::new(lat, lng))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

pub const MEAN_EARTH_RADIUS: Distance = Distance::from_meters(6_371_000.0);

/// Axis-aligned bounding box. If the south-west longitude is greater than
/// the north-east longitude the box wraps around the antimeridian.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    /// The smallest box that contains the circle around `center`.
    pub fn centered_at(center: MapPoint, radius: Distance) -> Self {
        let (lat, lng) = center.to_lat_lng_deg();
        let dlat = (radius.to_meters() / MEAN_EARTH_RADIUS.to_meters()).to_degrees();
        let south = lat - dlat;
        let north = lat + dlat;
        if south <= LatCoord::DEG_MIN || north >= LatCoord::DEG_MAX {
            // The circle covers a pole
            return Self::new(
                MapPoint::from_lat_lng_deg(south.max(LatCoord::DEG_MIN), LngCoord::DEG_MIN),
                MapPoint::from_lat_lng_deg(north.min(LatCoord::DEG_MAX), LngCoord::DEG_MAX),
            );
        }
        let dlng = dlat / lat.to_radians().cos();
        if dlng >= 180.0 {
            return Self::new(
                MapPoint::from_lat_lng_deg(south, LngCoord::DEG_MIN),
                MapPoint::from_lat_lng_deg(north, LngCoord::DEG_MAX),
            );
        }
        let west = wrap_lng(lng - dlng);
        let east = wrap_lng(lng + dlng);
        Self::new(
            MapPoint::from_lat_lng_deg(south, west),
            MapPoint::from_lat_lng_deg(north, east),
        )
    }

    pub const fn south_west(&self) -> MapPoint {
        self.sw
    }

    pub const fn north_east(&self) -> MapPoint {
        self.ne
    }

    pub fn wraps_antimeridian(&self) -> bool {
        self.sw.lng() > self.ne.lng()
    }

    pub fn contains_point(&self, pt: MapPoint) -> bool {
        if pt.lat() < self.sw.lat() || pt.lat() > self.ne.lat() {
            return false;
        }
        if self.wraps_antimeridian() {
            pt.lng() >= self.sw.lng() || pt.lng() <= self.ne.lng()
        } else {
            pt.lng() >= self.sw.lng() && pt.lng() <= self.ne.lng()
        }
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sw, self.ne)
    }
}

fn wrap_lng(deg: f64) -> f64 {
    if deg < LngCoord::DEG_MIN {
        deg + 360.0
    } else if deg > LngCoord::DEG_MAX {
        deg - 360.0
    } else {
        deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_bounds() {
        assert_eq!(LatCoord::from_deg(90).to_deg(), 90.0);
        assert_eq!(LngCoord::from_deg(-180).to_deg(), -180.0);
        assert_eq!(None, LatCoord::try_from_deg(90.000_001));
        assert_eq!(None, LatCoord::try_from_deg(f64::NAN));
        assert_eq!(None, LngCoord::try_from_deg(-180.1));
        assert!(MapPoint::try_from_lat_lng_deg(45.5, -73.57).is_some());
        assert!(MapPoint::try_from_lat_lng_deg(91, 0).is_none());
    }

    #[test]
    fn parse_map_point() {
        let p: MapPoint = "45.5,-73.57".parse().unwrap();
        assert_eq!(p.to_lat_lng_deg(), (45.5, -73.57));
        assert!("45.5".parse::<MapPoint>().is_err());
        assert!("95,0".parse::<MapPoint>().is_err());
    }

    #[test]
    fn no_distance() {
        let p = MapPoint::from_lat_lng_deg(-25.0, 55.0);
        assert_eq!(MapPoint::distance(p, p).to_meters(), 0.0);
    }

    #[test]
    fn short_distances() {
        // 0.001 degrees of latitude are ~111 m everywhere
        let p1 = MapPoint::from_lat_lng_deg(45.500, -73.570);
        let p2 = MapPoint::from_lat_lng_deg(45.501, -73.570);
        let d = MapPoint::distance(p1, p2).to_meters();
        assert!((d - 111.19).abs() < 0.1, "{d}");

        // 0.001 degrees of longitude shrink with the cosine of the latitude
        let p3 = MapPoint::from_lat_lng_deg(45.500, -73.569);
        let d = MapPoint::distance(p1, p3).to_meters();
        assert!((d - 77.9).abs() < 0.2, "{d}");
    }

    #[test]
    fn distance_across_antimeridian() {
        let p1 = MapPoint::from_lat_lng_deg(0.0, 179.9995);
        let p2 = MapPoint::from_lat_lng_deg(0.0, -179.9995);
        let d = MapPoint::distance(p1, p2).to_meters();
        assert!(d < 112.0, "{d}");
    }

    #[test]
    fn bbox_around_circle_contains_circle() {
        let center = MapPoint::from_lat_lng_deg(45.5, -73.57);
        let bbox = MapBbox::centered_at(center, Distance::from_meters(500.0));
        assert!(!bbox.wraps_antimeridian());
        assert!(bbox.contains_point(center));
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(45.504, -73.57)));
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(45.5, -73.5645)));
        assert!(!bbox.contains_point(MapPoint::from_lat_lng_deg(45.51, -73.57)));
    }

    #[test]
    fn bbox_wrapping_the_antimeridian() {
        let center = MapPoint::from_lat_lng_deg(10.0, 179.999);
        let bbox = MapBbox::centered_at(center, Distance::from_meters(1_000.0));
        assert!(bbox.wraps_antimeridian());
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(10.0, -179.999)));
        assert!(!bbox.contains_point(MapPoint::from_lat_lng_deg(10.0, 0.0)));
    }

    #[test]
    fn bbox_covering_a_pole() {
        let center = MapPoint::from_lat_lng_deg(89.999, 0.0);
        let bbox = MapBbox::centered_at(center, Distance::from_meters(1_000.0));
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(89.9995, 120.0)));
    }
}
