//! Inventory lot models
//!
//! A lot is one priceable quantity of a SKU at one physical location,
//! carrying the three volume-tier prices and the commission breakdown
//! negotiated with the supplier. Serde field names keep the legacy
//! storefront JSON contract (pt-BR price columns) for compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::LocationKey;

/// Volume-commitment price tiers, ordered from entry to best
///
/// `BandUpper` is the entry tier (lowest volume commitment, highest
/// price); `Unit` is the best tier (highest commitment, lowest price).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    BandUpper,
    BandLower,
    Unit,
}

impl PriceTier {
    /// Tiers ordered from least volume required to most volume required
    pub const ENTRY_TO_BEST: [PriceTier; 3] =
        [PriceTier::BandUpper, PriceTier::BandLower, PriceTier::Unit];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::BandUpper => "band_upper",
            PriceTier::BandLower => "band_lower",
            PriceTier::Unit => "unit",
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceTier::BandUpper => write!(f, "Entry"),
            PriceTier::BandLower => write!(f, "Mid"),
            PriceTier::Unit => write!(f, "Best"),
        }
    }
}

/// One priceable unit of stock at one physical location
///
/// Invariant: `unit_price <= band_lower_price <= band_upper_price`
/// (higher price = lower commitment); enforced by
/// [`crate::validation::validate_lot`] at construction/import time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLot {
    pub id: Uuid,
    pub sku: String,
    pub product_name: String,
    pub city: String,
    pub state: String,
    pub volume_available: Decimal,
    /// Best (highest-volume-commitment) price
    #[serde(rename = "preco_unitario")]
    pub unit_price: Decimal,
    /// Mid tier price
    #[serde(rename = "preco_banda_menor")]
    pub band_lower_price: Decimal,
    /// Entry (lowest-commitment) tier price
    #[serde(rename = "preco_banda_maior")]
    pub band_upper_price: Decimal,
    /// Minimum ordered volume to qualify for the mid tier
    pub band_lower_min_volume: Option<Decimal>,
    /// Minimum ordered volume to qualify for the best tier
    pub unit_min_volume: Option<Decimal>,
    #[serde(rename = "commission_unit")]
    pub commission_per_unit: Decimal,
    pub net_commission: Decimal,
    pub commission_percentage: Decimal,
    pub rep_percentage: Decimal,
    pub supplier_net: Decimal,
    /// Lots past this date are excluded from sellable aggregates
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl InventoryLot {
    pub fn location_key(&self) -> LocationKey {
        LocationKey::new(self.city.clone(), self.state.clone())
    }

    pub fn tier_price(&self, tier: PriceTier) -> Decimal {
        match tier {
            PriceTier::Unit => self.unit_price,
            PriceTier::BandLower => self.band_lower_price,
            PriceTier::BandUpper => self.band_upper_price,
        }
    }

    /// Minimum ordered volume for a tier; the entry tier has none
    pub fn tier_min_volume(&self, tier: PriceTier) -> Option<Decimal> {
        match tier {
            PriceTier::Unit => self.unit_min_volume,
            PriceTier::BandLower => self.band_lower_min_volume,
            PriceTier::BandUpper => None,
        }
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.expiry_date, Some(expiry) if expiry < today)
    }
}
