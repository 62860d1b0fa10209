//! Freight cost estimation
//!
//! Converts a one-way distance plus cargo value/volume into a delivered
//! cost under the per-delivery-type tariff tables. Freight is charged for
//! the outbound and return legs, so the billed distance is twice the
//! one-way distance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of supported delivery modes
///
/// Exhaustive by construction; there is no runtime "unknown delivery
/// type" path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Pickup,
    Domestic,
    International,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Pickup => "pickup",
            DeliveryType::Domestic => "domestic",
            DeliveryType::International => "international",
        }
    }

    /// Tariff for this mode; pickup has none
    fn tariff(&self) -> Option<Tariff> {
        match self {
            DeliveryType::Pickup => None,
            DeliveryType::Domestic => Some(Tariff {
                rate_per_km: Decimal::from(13),
                // 0.35% of cargo value
                insurance_rate: Decimal::from_parts(35, 0, 0, false, 4),
            }),
            DeliveryType::International => Some(Tariff {
                rate_per_km: Decimal::from(15),
                // 0.45% of cargo value
                insurance_rate: Decimal::from_parts(45, 0, 0, false, 4),
            }),
        }
    }
}

/// Per-km rate and insurance percentage for one delivery mode
#[derive(Debug, Clone, Copy)]
struct Tariff {
    rate_per_km: Decimal,
    insurance_rate: Decimal,
}

/// Derived freight cost breakdown; never stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreightQuote {
    pub delivery_type: DeliveryType,
    pub distance_km: u32,
    pub round_trip_km: u32,
    pub freight_subtotal: Decimal,
    pub insurance_amount: Decimal,
    pub total_freight_cost: Decimal,
    pub freight_per_unit: Decimal,
}

impl FreightQuote {
    fn zero(delivery_type: DeliveryType) -> Self {
        Self {
            delivery_type,
            distance_km: 0,
            round_trip_km: 0,
            freight_subtotal: Decimal::ZERO,
            insurance_amount: Decimal::ZERO,
            total_freight_cost: Decimal::ZERO,
            freight_per_unit: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FreightError {
    #[error("cargo value cannot be negative")]
    NegativeCargoValue,
    #[error("cargo volume cannot be negative")]
    NegativeCargoVolume,
}

/// Compute the freight cost for a shipment
///
/// Pickup always yields an all-zero quote. A zero cargo volume yields a
/// zero per-unit cost rather than a division error.
pub fn calculate_freight(
    delivery_type: DeliveryType,
    distance_km: u32,
    cargo_value: Decimal,
    cargo_volume: Decimal,
) -> Result<FreightQuote, FreightError> {
    if cargo_value < Decimal::ZERO {
        return Err(FreightError::NegativeCargoValue);
    }
    if cargo_volume < Decimal::ZERO {
        return Err(FreightError::NegativeCargoVolume);
    }

    let tariff = match delivery_type.tariff() {
        Some(tariff) => tariff,
        None => return Ok(FreightQuote::zero(delivery_type)),
    };

    // Distances arrive from untrusted callers; saturate instead of
    // overflowing on absurd values
    let round_trip_km = distance_km.saturating_mul(2);
    let freight_subtotal = Decimal::from(round_trip_km) * tariff.rate_per_km;
    let insurance_amount = cargo_value * tariff.insurance_rate;
    let total_freight_cost = freight_subtotal + insurance_amount;
    let freight_per_unit = if cargo_volume > Decimal::ZERO {
        total_freight_cost / cargo_volume
    } else {
        Decimal::ZERO
    };

    Ok(FreightQuote {
        delivery_type,
        distance_km,
        round_trip_km,
        freight_subtotal,
        insurance_amount,
        total_freight_cost,
        freight_per_unit,
    })
}
