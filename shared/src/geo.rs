//! Great-circle distance between stock locations
//!
//! Pure haversine math over decimal-degree coordinates. Callers are
//! responsible for validating coordinate ranges (see
//! [`crate::validation::validate_coordinates`]); this module assumes
//! well-formed input.

use serde::{Deserialize, Serialize};

use crate::types::GeoPoint;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, rounded to the nearest km
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> u32 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c).round() as u32
}

/// How close a stock location is to the buyer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    SameCity,
    SameState,
    Distant,
}

impl Proximity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proximity::SameCity => "same_city",
            Proximity::SameState => "same_state",
            Proximity::Distant => "distant",
        }
    }
}

/// Bucket a distance into a proximity label for display
pub fn proximity_category(km: u32) -> Proximity {
    if km < 50 {
        Proximity::SameCity
    } else if km < 500 {
        Proximity::SameState
    } else {
        Proximity::Distant
    }
}

/// Human-readable distance label
///
/// Distances of 100 km or more are rounded to the nearest 10 km; the
/// precision would be spurious at that range.
pub fn format_distance(km: u32) -> String {
    if km < 1 {
        return "same locality".to_string();
    }
    let display_km = if km >= 100 { (km + 5) / 10 * 10 } else { km };
    format!("~{} km", display_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(-15.601, -56.097);
        assert_eq!(distance_km(p, p), 0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let cuiaba = GeoPoint::new(-15.601, -56.097);
        let sorriso = GeoPoint::new(-12.545, -55.711);
        assert_eq!(distance_km(cuiaba, sorriso), distance_km(sorriso, cuiaba));
    }

    #[test]
    fn test_known_distance_cuiaba_sorriso() {
        // Cuiabá/MT to Sorriso/MT is roughly 342 km great-circle
        let cuiaba = GeoPoint::new(-15.601, -56.097);
        let sorriso = GeoPoint::new(-12.545, -55.711);
        let km = distance_km(cuiaba, sorriso);
        assert!((335..=350).contains(&km), "got {} km", km);
    }

    #[test]
    fn test_proximity_boundaries() {
        assert_eq!(proximity_category(0), Proximity::SameCity);
        assert_eq!(proximity_category(49), Proximity::SameCity);
        assert_eq!(proximity_category(50), Proximity::SameState);
        assert_eq!(proximity_category(499), Proximity::SameState);
        assert_eq!(proximity_category(500), Proximity::Distant);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0), "same locality");
        assert_eq!(format_distance(1), "~1 km");
        assert_eq!(format_distance(99), "~99 km");
        assert_eq!(format_distance(104), "~100 km");
        assert_eq!(format_distance(105), "~110 km");
        assert_eq!(format_distance(342), "~340 km");
    }
}
