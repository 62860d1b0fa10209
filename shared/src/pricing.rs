//! Volume-tier price benefits
//!
//! Derives the three-tier price ladder for a SKU from its inventory lots.
//! Prices come from the first lot of the supplied slice; that is the
//! documented contract (callers control lot ordering), not an accident.
//! Tier selection for a concrete ordered volume happens at order time,
//! outside this crate; this engine only exposes the ladder, its ordering,
//! and the per-tier minimum-volume thresholds needed for that decision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{InventoryLot, PriceTier};

/// One rung of the price ladder for a SKU
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierBenefit {
    pub tier: PriceTier,
    pub price: Decimal,
    /// Amount lost per unit versus the best (Unit) price; zero for Unit
    pub savings: Decimal,
    /// `savings` relative to the unit price, in percent
    pub savings_percent: Decimal,
    /// Minimum ordered volume to qualify for this tier, when configured
    pub min_volume: Option<Decimal>,
}

/// Build the price ladder for a SKU from its lots
///
/// Output is ordered from least volume required to most (entry tier
/// first, Unit tier last) and is empty for an empty lot list.
pub fn price_benefits(lots: &[InventoryLot]) -> Vec<TierBenefit> {
    let source = match lots.first() {
        Some(lot) => lot,
        None => return Vec::new(),
    };

    let unit_price = source.unit_price;
    PriceTier::ENTRY_TO_BEST
        .iter()
        .map(|&tier| {
            let price = source.tier_price(tier);
            let savings = price - unit_price;
            let savings_percent = if unit_price > Decimal::ZERO {
                savings / unit_price * Decimal::from(100)
            } else {
                Decimal::ZERO
            };
            TierBenefit {
                tier,
                price,
                savings,
                savings_percent,
                min_volume: source.tier_min_volume(tier),
            }
        })
        .collect()
}
