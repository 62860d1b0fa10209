//! Per-SKU inventory aggregation
//!
//! Two intentionally different views over the same lots:
//!
//! - [`group_for_sales`] deduplicates volume per physical location
//!   (several rows reporting the same site must not double-count) and
//!   skips expired lots. This feeds the sales display and the price-tier
//!   engine.
//! - [`products_with_inventory`] sums every lot row regardless of
//!   location. This feeds the full technical catalog.
//!
//! Callers must pick the view matching their display; the totals differ
//! whenever a site is reported across multiple rows.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::InventoryLot;

/// Aggregate sales view over all lots sharing a SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedProduct {
    pub sku: String,
    /// Representative lot used to source example prices/commission;
    /// by contract this is the first lot encountered for the SKU
    pub main_item: InventoryLot,
    /// Every sellable lot for the SKU, all locations and tiers
    pub all_items: Vec<InventoryLot>,
    /// Volume summed across distinct locations, first-seen-wins per site
    pub total_volume: Decimal,
    pub locations_count: usize,
}

/// Catalog view: plain volume sum per SKU, no deduplication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductInventory {
    pub sku: String,
    pub total_volume: Decimal,
    pub lot_count: usize,
}

/// Group sellable lots by SKU for the sales display
///
/// Expired lots are dropped. Duplicate rows for the same (city, state)
/// contribute only their first-seen volume: a site reporting "X in stock"
/// across several rows holds X total, not the sum. Output order follows
/// first appearance of each SKU in the input, so the result is
/// deterministic for a given input ordering.
pub fn group_for_sales(lots: &[InventoryLot], today: NaiveDate) -> Vec<GroupedProduct> {
    let mut groups: Vec<GroupedProduct> = Vec::new();
    let mut index_by_sku: HashMap<String, usize> = HashMap::new();
    let mut seen_locations: Vec<HashSet<String>> = Vec::new();

    for lot in lots {
        if lot.is_expired(today) {
            continue;
        }

        let idx = match index_by_sku.get(&lot.sku) {
            Some(&idx) => idx,
            None => {
                index_by_sku.insert(lot.sku.clone(), groups.len());
                groups.push(GroupedProduct {
                    sku: lot.sku.clone(),
                    main_item: lot.clone(),
                    all_items: Vec::new(),
                    total_volume: Decimal::ZERO,
                    locations_count: 0,
                });
                seen_locations.push(HashSet::new());
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        group.all_items.push(lot.clone());

        let key = lot.location_key().normalized();
        if seen_locations[idx].insert(key) {
            group.total_volume += lot.volume_available;
            group.locations_count += 1;
        }
    }

    groups
}

/// Sum all lot volumes per SKU for the technical catalog
///
/// No location deduplication and no expiry filter: this reports every
/// physical row in the inventory, in first-seen SKU order.
pub fn products_with_inventory(lots: &[InventoryLot]) -> Vec<ProductInventory> {
    let mut products: Vec<ProductInventory> = Vec::new();
    let mut index_by_sku: HashMap<String, usize> = HashMap::new();

    for lot in lots {
        let idx = match index_by_sku.get(&lot.sku) {
            Some(&idx) => idx,
            None => {
                index_by_sku.insert(lot.sku.clone(), products.len());
                products.push(ProductInventory {
                    sku: lot.sku.clone(),
                    total_volume: Decimal::ZERO,
                    lot_count: 0,
                });
                products.len() - 1
            }
        };
        products[idx].total_volume += lot.volume_available;
        products[idx].lot_count += 1;
    }

    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn lot(sku: &str, city: &str, state: &str, volume: i64) -> InventoryLot {
        InventoryLot {
            id: Uuid::new_v4(),
            sku: sku.to_string(),
            product_name: format!("Product {}", sku),
            city: city.to_string(),
            state: state.to_string(),
            volume_available: Decimal::from(volume),
            unit_price: Decimal::from(100),
            band_lower_price: Decimal::from(110),
            band_upper_price: Decimal::from(120),
            band_lower_min_volume: None,
            unit_min_volume: None,
            commission_per_unit: Decimal::ZERO,
            net_commission: Decimal::ZERO,
            commission_percentage: Decimal::ZERO,
            rep_percentage: Decimal::ZERO,
            supplier_net: Decimal::ZERO,
            expiry_date: None,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(group_for_sales(&[], today()).is_empty());
        assert!(products_with_inventory(&[]).is_empty());
    }

    #[test]
    fn test_duplicate_location_first_seen_wins() {
        let lots = vec![
            lot("GLY-480", "Sorriso", "MT", 100),
            lot("GLY-480", "Sorriso", "MT", 999),
        ];

        let grouped = group_for_sales(&lots, today());
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].total_volume, Decimal::from(100));
        assert_eq!(grouped[0].locations_count, 1);
        // Both rows are still listed
        assert_eq!(grouped[0].all_items.len(), 2);

        // Catalog view sums every row
        let catalog = products_with_inventory(&lots);
        assert_eq!(catalog[0].total_volume, Decimal::from(1099));
        assert_eq!(catalog[0].lot_count, 2);
    }

    #[test]
    fn test_distinct_locations_are_summed() {
        let lots = vec![
            lot("GLY-480", "Sorriso", "MT", 100),
            lot("GLY-480", "Cuiabá", "MT", 250),
            lot("GLY-480", "Sorriso", "PR", 50),
        ];
        let grouped = group_for_sales(&lots, today());
        assert_eq!(grouped[0].total_volume, Decimal::from(400));
        assert_eq!(grouped[0].locations_count, 3);
    }

    #[test]
    fn test_location_key_is_case_insensitive() {
        let lots = vec![
            lot("GLY-480", "Sorriso", "MT", 100),
            lot("GLY-480", "SORRISO", "mt", 999),
        ];
        let grouped = group_for_sales(&lots, today());
        assert_eq!(grouped[0].total_volume, Decimal::from(100));
        assert_eq!(grouped[0].locations_count, 1);
    }

    #[test]
    fn test_main_item_is_first_seen_lot() {
        let mut first = lot("GLY-480", "Sorriso", "MT", 100);
        first.unit_price = Decimal::from(42);
        let lots = vec![first, lot("GLY-480", "Cuiabá", "MT", 250)];
        let grouped = group_for_sales(&lots, today());
        assert_eq!(grouped[0].main_item.unit_price, Decimal::from(42));
    }

    #[test]
    fn test_groups_preserve_input_sku_order() {
        let lots = vec![
            lot("NPK-201005", "Cuiabá", "MT", 10),
            lot("GLY-480", "Sorriso", "MT", 20),
            lot("NPK-201005", "Sorriso", "MT", 30),
        ];
        let grouped = group_for_sales(&lots, today());
        assert_eq!(grouped[0].sku, "NPK-201005");
        assert_eq!(grouped[1].sku, "GLY-480");
    }

    #[test]
    fn test_expired_lots_excluded_from_sales_only() {
        let mut expired = lot("GLY-480", "Sorriso", "MT", 100);
        expired.expiry_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        let lots = vec![expired, lot("GLY-480", "Cuiabá", "MT", 250)];

        let grouped = group_for_sales(&lots, today());
        assert_eq!(grouped[0].total_volume, Decimal::from(250));
        assert_eq!(grouped[0].all_items.len(), 1);

        let catalog = products_with_inventory(&lots);
        assert_eq!(catalog[0].total_volume, Decimal::from(350));
    }
}
