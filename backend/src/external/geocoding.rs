//! Geocoding client for resolving city coordinates
//!
//! Resolves a (city, state) pair to decimal-degree coordinates through a
//! Nominatim-compatible API. City coordinates are immutable reference
//! data, so successful lookups are cached in-process for the lifetime of
//! the server. A city the provider does not know is a `None`, never an
//! error: freight quoting must degrade to "distance unavailable", not
//! fail the whole product page.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use shared::types::{GeoPoint, LocationKey};
use shared::validation::validate_coordinates;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// Geocoding API client with a permanent in-process coordinate cache
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    api_key: String,
    cache: Arc<RwLock<HashMap<String, GeoPoint>>>,
}

/// One match in a Nominatim-style search response
#[derive(Debug, Deserialize)]
struct PlaceResult {
    lat: String,
    lon: String,
}

impl GeocodingClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve coordinates for a city/state, `None` when unknown
    pub async fn lookup(&self, location: &LocationKey) -> AppResult<Option<GeoPoint>> {
        let key = location.normalized();

        if let Some(point) = self.cache.read().await.get(&key) {
            return Ok(Some(*point));
        }

        let mut query = vec![
            ("city", location.city.clone()),
            ("state", location.state.clone()),
            ("country", "Brazil".to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        if !self.api_key.is_empty() {
            query.push(("key", self.api_key.clone()));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&query)
            .header("User-Agent", "agroikemba-backend")
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                city = %location.city,
                state = %location.state,
                "Geocoding API returned an error status"
            );
            return Err(AppError::GeocodingUnavailable);
        }

        let places: Vec<PlaceResult> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid geocoding response: {}", e)))?;

        let place = match places.into_iter().next() {
            Some(place) => place,
            None => {
                tracing::debug!(city = %location.city, state = %location.state, "City not found by geocoder");
                return Ok(None);
            }
        };

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| AppError::ExternalService("non-numeric latitude".to_string()))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| AppError::ExternalService("non-numeric longitude".to_string()))?;
        validate_coordinates(latitude, longitude)
            .map_err(|msg| AppError::ExternalService(msg.to_string()))?;

        let point = GeoPoint::new(latitude, longitude);
        self.cache.write().await.insert(key, point);

        Ok(Some(point))
    }

    /// Seed the cache directly, bypassing the API (tests, preloading)
    pub async fn seed(&self, location: &LocationKey, point: GeoPoint) {
        self.cache.write().await.insert(location.normalized(), point);
    }
}
