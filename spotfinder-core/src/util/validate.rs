use crate::{entities::*, usecases::Error};

pub const MAX_NOTE_LEN: usize = 500;

pub fn position(lat: f64, lng: f64) -> Result<MapPoint, Error> {
    MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(Error::InvalidPosition)
}

/// Trims the note and maps blank notes to `None`.
pub fn note(note: Option<String>) -> Result<Option<String>, Error> {
    let Some(note) = note else {
        return Ok(None);
    };
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NOTE_LEN {
        return Err(Error::InvalidNote);
    }
    Ok(Some(trimmed.to_owned()))
}

/// Falls back to `default` if absent and clamps to `max`.
pub fn radius(radius: Option<f64>, default: Distance, max: Distance) -> Result<Distance, Error> {
    let Some(meters) = radius else {
        return Ok(default);
    };
    if !meters.is_finite() || meters <= 0.0 {
        return Err(Error::InvalidRadius);
    }
    Ok(Distance::from_meters(meters.min(max.to_meters())))
}

pub fn status(status: &str) -> Result<ReportStatus, Error> {
    status.parse().map_err(|_| Error::InvalidStatus)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Distance = Distance::from_meters(500.0);
    const MAX: Distance = Distance::from_meters(50_000.0);

    #[test]
    fn position_bounds() {
        assert!(position(90.0, 180.0).is_ok());
        assert!(position(-90.0, -180.0).is_ok());
        assert!(matches!(position(90.1, 0.0), Err(Error::InvalidPosition)));
        assert!(matches!(position(0.0, -180.5), Err(Error::InvalidPosition)));
        assert!(matches!(position(f64::NAN, 0.0), Err(Error::InvalidPosition)));
    }

    #[test]
    fn blank_notes_are_dropped() {
        assert_eq!(note(None).unwrap(), None);
        assert_eq!(note(Some("   ".into())).unwrap(), None);
        assert_eq!(
            note(Some(" near the bakery ".into())).unwrap().as_deref(),
            Some("near the bakery")
        );
    }

    #[test]
    fn overlong_notes_are_rejected() {
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(matches!(note(Some(long)), Err(Error::InvalidNote)));
        let max = "ü".repeat(MAX_NOTE_LEN);
        assert!(note(Some(max)).is_ok());
    }

    #[test]
    fn radius_defaults_and_clamping() {
        assert_eq!(radius(None, DEFAULT, MAX).unwrap(), DEFAULT);
        assert_eq!(radius(Some(42.0), DEFAULT, MAX).unwrap().to_meters(), 42.0);
        assert_eq!(radius(Some(1e9), DEFAULT, MAX).unwrap(), MAX);
        assert!(matches!(radius(Some(0.0), DEFAULT, MAX), Err(Error::InvalidRadius)));
        assert!(matches!(radius(Some(-5.0), DEFAULT, MAX), Err(Error::InvalidRadius)));
        assert!(matches!(radius(Some(f64::INFINITY), DEFAULT, MAX), Err(Error::InvalidRadius)));
    }
}
