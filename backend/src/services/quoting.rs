//! Quoting service: delivered-cost and commission estimates
//!
//! Combines the coordinate lookup, great-circle distance, and freight
//! tariffs into the delivery estimate shown on a product page, and wraps
//! the commission calculators for the representative's proposal screen.
//! When either endpoint of a route cannot be geocoded the estimate
//! degrades to "distance unavailable" instead of failing; the page still
//! renders without a freight figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::commission::{fixed_commission_only, representative_gain, CommissionQuote};
use shared::freight::{calculate_freight, DeliveryType, FreightQuote};
use shared::geo::{distance_km, format_distance, proximity_category, Proximity};
use shared::types::LocationKey;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::GeocodingClient;

/// Quoting service over the geocoding client and pure calculators
#[derive(Clone)]
pub struct QuotingService {
    geocoding: GeocodingClient,
}

/// Input for a delivery estimate
#[derive(Debug, Deserialize, Validate)]
pub struct DeliveryEstimateInput {
    pub delivery_type: DeliveryType,
    #[validate(length(min = 1, message = "origin city is required"))]
    pub origin_city: String,
    #[validate(length(min = 1, message = "origin state is required"))]
    pub origin_state: String,
    #[validate(length(min = 1, message = "destination city is required"))]
    pub destination_city: String,
    #[validate(length(min = 1, message = "destination state is required"))]
    pub destination_state: String,
    pub cargo_value: Decimal,
    pub cargo_volume: Decimal,
}

/// Delivery estimate for a product page
///
/// `distance_available == false` means one of the route endpoints could
/// not be geocoded; the distance-dependent fields are absent and no
/// freight cost is quoted.
#[derive(Debug, Serialize)]
pub struct DeliveryEstimate {
    pub delivery_type: DeliveryType,
    pub distance_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Proximity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freight: Option<FreightQuote>,
}

/// Input for a commission quote; overprice defaults to 0, volume to 1
#[derive(Debug, Deserialize)]
pub struct CommissionQuoteInput {
    pub base_price: Decimal,
    pub overprice_amount: Option<Decimal>,
    pub volume: Option<Decimal>,
}

/// Input for a blended-price commission quote
#[derive(Debug, Deserialize)]
pub struct BlendedCommissionInput {
    pub final_price: Decimal,
    pub volume: Option<Decimal>,
}

/// Commission computed off a blended final price
#[derive(Debug, Serialize)]
pub struct BlendedCommissionQuote {
    pub final_price: Decimal,
    pub volume: Decimal,
    pub fixed_commission: Decimal,
}

impl QuotingService {
    pub fn new(geocoding: GeocodingClient) -> Self {
        Self { geocoding }
    }

    /// Estimate the delivered cost for a route
    pub async fn delivery_estimate(
        &self,
        input: DeliveryEstimateInput,
    ) -> AppResult<DeliveryEstimate> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // Pickup needs no route at all
        if input.delivery_type == DeliveryType::Pickup {
            let freight = calculate_freight(
                DeliveryType::Pickup,
                0,
                input.cargo_value,
                input.cargo_volume,
            )
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
            return Ok(DeliveryEstimate {
                delivery_type: input.delivery_type,
                distance_available: true,
                distance_km: Some(0),
                distance_label: None,
                proximity: None,
                freight: Some(freight),
            });
        }

        let origin = LocationKey::new(input.origin_city.clone(), input.origin_state.clone());
        let destination = LocationKey::new(
            input.destination_city.clone(),
            input.destination_state.clone(),
        );

        let (origin_point, destination_point) = match (
            self.resolve(&origin).await,
            self.resolve(&destination).await,
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Ok(DeliveryEstimate {
                    delivery_type: input.delivery_type,
                    distance_available: false,
                    distance_km: None,
                    distance_label: None,
                    proximity: None,
                    freight: None,
                })
            }
        };

        let km = distance_km(origin_point, destination_point);
        let freight = calculate_freight(
            input.delivery_type,
            km,
            input.cargo_value,
            input.cargo_volume,
        )
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

        Ok(DeliveryEstimate {
            delivery_type: input.delivery_type,
            distance_available: true,
            distance_km: Some(km),
            distance_label: Some(format_distance(km)),
            proximity: Some(proximity_category(km)),
            freight: Some(freight),
        })
    }

    /// Gain breakdown for a representative proposal line
    pub fn commission_quote(&self, input: CommissionQuoteInput) -> AppResult<CommissionQuote> {
        representative_gain(
            input.base_price,
            input.overprice_amount.unwrap_or(Decimal::ZERO),
            input.volume.unwrap_or(Decimal::ONE),
        )
        .map_err(|e| AppError::ValidationError(e.to_string()))
    }

    /// Fixed commission off a blended final price (no base/overprice split)
    pub fn blended_commission(
        &self,
        input: BlendedCommissionInput,
    ) -> AppResult<BlendedCommissionQuote> {
        let volume = input.volume.unwrap_or(Decimal::ONE);
        let fixed_commission = fixed_commission_only(input.final_price, volume)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        Ok(BlendedCommissionQuote {
            final_price: input.final_price,
            volume,
            fixed_commission,
        })
    }

    /// Coordinate lookup that treats provider failures as "unknown city"
    async fn resolve(&self, location: &LocationKey) -> Option<shared::types::GeoPoint> {
        match self.geocoding.lookup(location).await {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(
                    city = %location.city,
                    state = %location.state,
                    error = %e,
                    "Coordinate lookup failed; continuing without distance"
                );
                None
            }
        }
    }
}
