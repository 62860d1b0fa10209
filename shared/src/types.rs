//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Physical stock location, identified by (city, state)
///
/// Not globally unique: several lots of the same SKU can sit at the same
/// location. Aggregation code keys on the normalized form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub city: String,
    pub state: String,
}

impl LocationKey {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }

    /// Case- and whitespace-insensitive key used for deduplication
    pub fn normalized(&self) -> String {
        format!(
            "{}|{}",
            self.city.trim().to_lowercase(),
            self.state.trim().to_lowercase()
        )
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.city, self.state)
    }
}
