//! Validation utilities for the AgroIkemba trading platform
//!
//! Guards applied at lot import and reservation creation. The legacy
//! storefront mostly skipped validation; these checks reject negative or
//! inverted values before they can surface as nonsense quotes.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::models::InventoryLot;

/// Shortest allowed reservation TTL, in hours
pub const MIN_RESERVATION_TTL_HOURS: i64 = 24;

/// Longest allowed reservation TTL, in hours
pub const MAX_RESERVATION_TTL_HOURS: i64 = 72;

// ============================================================================
// Lot Validations
// ============================================================================

/// Validate an inventory lot at import/admin-entry time
///
/// Enforces non-negative quantities/prices and the tier ordering
/// invariant `unit <= band_lower <= band_upper` (higher price = lower
/// commitment).
pub fn validate_lot(lot: &InventoryLot) -> Result<(), &'static str> {
    if lot.sku.trim().is_empty() {
        return Err("SKU cannot be empty");
    }
    if lot.volume_available < Decimal::ZERO {
        return Err("Available volume cannot be negative");
    }
    if lot.unit_price < Decimal::ZERO
        || lot.band_lower_price < Decimal::ZERO
        || lot.band_upper_price < Decimal::ZERO
    {
        return Err("Tier prices cannot be negative");
    }
    if lot.unit_price > lot.band_lower_price || lot.band_lower_price > lot.band_upper_price {
        return Err("Tier prices must satisfy unit <= band_lower <= band_upper");
    }
    if let (Some(band_lower_min), Some(unit_min)) =
        (lot.band_lower_min_volume, lot.unit_min_volume)
    {
        if band_lower_min > unit_min {
            return Err("Mid tier minimum volume cannot exceed best tier minimum");
        }
    }
    Ok(())
}

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Validate decimal-degree coordinate ranges
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err("Coordinates must be finite numbers");
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90 degrees");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180 degrees");
    }
    Ok(())
}

// ============================================================================
// Reservation Validations
// ============================================================================

/// Validate the volume requested for a reservation hold
pub fn validate_reserved_volume(volume: Decimal) -> Result<(), &'static str> {
    if volume <= Decimal::ZERO {
        return Err("Reserved volume must be positive");
    }
    Ok(())
}

/// Validate a reservation expiry against the business TTL window (24-72h)
///
/// Compared as full durations, not truncated hour counts: 72h01m is over
/// the window, 23h59m is under it.
pub fn validate_reservation_ttl(
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<(), &'static str> {
    let ttl = expires_at - created_at;
    if ttl < Duration::hours(MIN_RESERVATION_TTL_HOURS) {
        return Err("Reservation TTL must be at least 24 hours");
    }
    if ttl > Duration::hours(MAX_RESERVATION_TTL_HOURS) {
        return Err("Reservation TTL must be at most 72 hours");
    }
    Ok(())
}
