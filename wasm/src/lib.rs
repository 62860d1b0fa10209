//! WebAssembly module for the AgroIkemba trading platform
//!
//! Provides client-side computation for:
//! - Distance and proximity between trading locations
//! - Freight cost previews while the buyer edits a quote
//! - Representative commission previews
//! - Volume-tier price ladders for product pages

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::freight::{calculate_freight, DeliveryType};
use shared::geo;
use shared::pricing;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Great-circle distance between two points, rounded to whole km
#[wasm_bindgen]
pub fn distance_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> u32 {
    geo::distance_km(GeoPoint::new(lat1, lon1), GeoPoint::new(lat2, lon2))
}

/// Proximity bucket for a distance: "same_city", "same_state" or "distant"
#[wasm_bindgen]
pub fn classify_proximity(distance_km: u32) -> String {
    geo::proximity_category(distance_km).as_str().to_string()
}

/// Buyer-facing distance label ("~340 km", "same locality")
#[wasm_bindgen]
pub fn format_distance_label(distance_km: u32) -> String {
    geo::format_distance(distance_km)
}

/// Freight cost preview as a JSON breakdown
///
/// `delivery_type` is one of "pickup", "domestic" or "international";
/// `distance_km` is the one-way distance.
#[wasm_bindgen]
pub fn preview_freight(
    delivery_type: &str,
    distance_km: u32,
    cargo_value: f64,
    cargo_volume: f64,
) -> Result<String, JsValue> {
    let delivery_type = parse_delivery_type(delivery_type)?;
    let cargo_value = to_decimal(cargo_value, "cargo_value")?;
    let cargo_volume = to_decimal(cargo_volume, "cargo_volume")?;

    let quote = calculate_freight(delivery_type, distance_km, cargo_value, cargo_volume)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&quote).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Representative gain preview for a base price plus overprice
#[wasm_bindgen]
pub fn preview_representative_gain(
    base_price: f64,
    overprice: f64,
    volume: f64,
) -> Result<String, JsValue> {
    let base_price = to_decimal(base_price, "base_price")?;
    let overprice = to_decimal(overprice, "overprice")?;
    let volume = to_decimal(volume, "volume")?;

    let quote = shared::commission::representative_gain(base_price, overprice, volume)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&quote).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Fixed commission on an already-blended final price
#[wasm_bindgen]
pub fn preview_fixed_commission(final_price: f64, volume: f64) -> Result<f64, JsValue> {
    let final_price = to_decimal(final_price, "final_price")?;
    let volume = to_decimal(volume, "volume")?;

    let commission = shared::commission::fixed_commission_only(final_price, volume)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(commission.to_string().parse().unwrap_or(0.0))
}

/// Volume-tier price ladder for a product page
///
/// Takes the product's lots as a JSON array and returns the tier
/// benefits (entry tier first, best tier last) as JSON.
#[wasm_bindgen]
pub fn price_ladder(lots_json: &str) -> Result<String, JsValue> {
    let lots: Vec<InventoryLot> = serde_json::from_str(lots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid lots JSON: {}", e)))?;

    let benefits = pricing::price_benefits(&lots);
    serde_json::to_string(&benefits).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate coordinates before a geocoding round trip
#[wasm_bindgen]
pub fn coordinates_are_valid(latitude: f64, longitude: f64) -> bool {
    validate_coordinates(latitude, longitude).is_ok()
}

fn parse_delivery_type(raw: &str) -> Result<DeliveryType, JsValue> {
    match raw {
        "pickup" => Ok(DeliveryType::Pickup),
        "domestic" => Ok(DeliveryType::Domestic),
        "international" => Ok(DeliveryType::International),
        other => Err(JsValue::from_str(&format!(
            "Unknown delivery type: {}",
            other
        ))),
    }
}

fn to_decimal(value: f64, field: &str) -> Result<Decimal, JsValue> {
    Decimal::try_from(value)
        .map_err(|_| JsValue::from_str(&format!("{} is not a representable number", field)))
}
