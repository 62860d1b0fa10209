//! Property-based tests for the trading core calculators
//!
//! Covers the cross-cutting invariants of the pure calculation layer:
//! - Haversine symmetry and identity
//! - Freight tariffs (pickup zero, distance monotonicity, zero-volume guard)
//! - Commission split invariant (fixed part never depends on overprice)
//! - Tier ordering preservation through the price ladder
//! - Aggregation dedup vs full-sum relationship
//! - Reservation state machine terminal immutability

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::commission::{fixed_commission_only, representative_gain, COMMISSION_RATE};
use shared::freight::{calculate_freight, DeliveryType};
use shared::geo::{distance_km, proximity_category, Proximity};
use shared::grouping::{group_for_sales, products_with_inventory};
use shared::models::{InventoryLot, PriceTier, ReservationStatus};
use shared::pricing::price_benefits;
use shared::types::GeoPoint;

// ============================================================================
// Strategies
// ============================================================================

/// Valid latitude in decimal degrees
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Valid longitude in decimal degrees
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

fn geo_point_strategy() -> impl Strategy<Value = GeoPoint> {
    (latitude_strategy(), longitude_strategy()).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
}

/// Non-negative money amount with cent precision
fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Non-negative volume with liter precision
fn volume_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000).prop_map(Decimal::from)
}

/// Three tier prices satisfying unit <= band_lower <= band_upper
fn tier_prices_strategy() -> impl Strategy<Value = (Decimal, Decimal, Decimal)> {
    (1i64..=100_000, 0i64..=10_000, 0i64..=10_000).prop_map(|(unit, step1, step2)| {
        let unit = Decimal::new(unit, 2);
        let band_lower = unit + Decimal::new(step1, 2);
        let band_upper = band_lower + Decimal::new(step2, 2);
        (unit, band_lower, band_upper)
    })
}

fn lot_with_prices(
    sku: &str,
    city: &str,
    state: &str,
    volume: Decimal,
    prices: (Decimal, Decimal, Decimal),
) -> InventoryLot {
    InventoryLot {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        product_name: format!("Product {}", sku),
        city: city.to_string(),
        state: state.to_string(),
        volume_available: volume,
        unit_price: prices.0,
        band_lower_price: prices.1,
        band_upper_price: prices.2,
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
    Utc::now().date_naive()
}

// ============================================================================
// Property 1: Haversine symmetry and identity
// ============================================================================

proptest! {
    #[test]
    fn haversine_is_symmetric(a in geo_point_strategy(), b in geo_point_strategy()) {
        prop_assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn haversine_identity_is_zero(p in geo_point_strategy()) {
        prop_assert_eq!(distance_km(p, p), 0);
    }

    #[test]
    fn proximity_buckets_are_total(km in 0u32..=30_000) {
        let category = proximity_category(km);
        if km < 50 {
            prop_assert_eq!(category, Proximity::SameCity);
        } else if km < 500 {
            prop_assert_eq!(category, Proximity::SameState);
        } else {
            prop_assert_eq!(category, Proximity::Distant);
        }
    }
}

// ============================================================================
// Property 2 & 3: Freight tariffs
// ============================================================================

proptest! {
    #[test]
    fn pickup_freight_is_always_zero(
        km in 0u32..=20_000,
        value in money_strategy(),
        volume in volume_strategy(),
    ) {
        let quote = calculate_freight(DeliveryType::Pickup, km, value, volume).unwrap();
        prop_assert_eq!(quote.total_freight_cost, Decimal::ZERO);
        prop_assert_eq!(quote.freight_per_unit, Decimal::ZERO);
    }

    #[test]
    fn freight_cost_strictly_increases_with_distance(
        km in 0u32..=10_000,
        extra in 1u32..=5_000,
        value in money_strategy(),
        volume in volume_strategy(),
    ) {
        for delivery_type in [DeliveryType::Domestic, DeliveryType::International] {
            let near = calculate_freight(delivery_type, km, value, volume).unwrap();
            let far = calculate_freight(delivery_type, km + extra, value, volume).unwrap();
            prop_assert!(far.total_freight_cost > near.total_freight_cost);
        }
    }

    #[test]
    fn freight_per_unit_never_divides_by_zero(
        km in 0u32..=10_000,
        value in money_strategy(),
    ) {
        let quote = calculate_freight(DeliveryType::Domestic, km, value, Decimal::ZERO).unwrap();
        prop_assert_eq!(quote.freight_per_unit, Decimal::ZERO);
    }

    #[test]
    fn freight_total_is_subtotal_plus_insurance(
        km in 0u32..=10_000,
        value in money_strategy(),
        volume in volume_strategy(),
    ) {
        let quote = calculate_freight(DeliveryType::International, km, value, volume).unwrap();
        prop_assert_eq!(quote.round_trip_km, km * 2);
        prop_assert_eq!(
            quote.total_freight_cost,
            quote.freight_subtotal + quote.insurance_amount
        );
    }
}

#[test]
fn freight_worked_example_domestic() {
    let quote = calculate_freight(
        DeliveryType::Domestic,
        200,
        Decimal::from(50_000),
        Decimal::from(1000),
    )
    .unwrap();
    assert_eq!(quote.round_trip_km, 400);
    assert_eq!(quote.freight_subtotal, Decimal::from(5200));
    assert_eq!(quote.insurance_amount, Decimal::from(175));
    assert_eq!(quote.total_freight_cost, Decimal::from(5375));
    assert_eq!(quote.freight_per_unit, Decimal::new(5375, 3));
}

// ============================================================================
// Property 4: Commission split invariant
// ============================================================================

proptest! {
    #[test]
    fn commission_invariant_holds(
        base in money_strategy(),
        overprice in money_strategy(),
        volume in volume_strategy(),
    ) {
        let quote = representative_gain(base, overprice, volume).unwrap();
        prop_assert_eq!(quote.total_gain, quote.fixed_commission + quote.overprice_gain);
        prop_assert_eq!(quote.fixed_commission, base * COMMISSION_RATE * volume);
        prop_assert_eq!(quote.final_price, base + overprice);
    }

    #[test]
    fn fixed_commission_independent_of_overprice(
        base in money_strategy(),
        overprice_a in money_strategy(),
        overprice_b in money_strategy(),
        volume in volume_strategy(),
    ) {
        let a = representative_gain(base, overprice_a, volume).unwrap();
        let b = representative_gain(base, overprice_b, volume).unwrap();
        prop_assert_eq!(a.fixed_commission, b.fixed_commission);
    }

    #[test]
    fn blended_entry_point_rates_the_final_price(
        price in money_strategy(),
        volume in volume_strategy(),
    ) {
        let blended = fixed_commission_only(price, volume).unwrap();
        prop_assert_eq!(blended, price * COMMISSION_RATE * volume);
    }
}

#[test]
fn commission_worked_example() {
    let quote = representative_gain(Decimal::from(100), Decimal::from(20), Decimal::from(500))
        .unwrap();
    assert_eq!(quote.final_price, Decimal::from(120));
    assert_eq!(quote.fixed_commission, Decimal::from(750));
    assert_eq!(quote.overprice_gain, Decimal::from(10_000));
    assert_eq!(quote.total_gain, Decimal::from(10_750));
}

// ============================================================================
// Property 5: Tier ordering through the price ladder
// ============================================================================

proptest! {
    #[test]
    fn price_ladder_preserves_tier_ordering(
        prices in tier_prices_strategy(),
        volume in volume_strategy(),
    ) {
        let lot = lot_with_prices("SKU-1", "Sorriso", "MT", volume, prices);
        let benefits = price_benefits(std::slice::from_ref(&lot));

        prop_assert_eq!(benefits.len(), 3);
        prop_assert_eq!(benefits[0].tier, PriceTier::BandUpper);
        prop_assert_eq!(benefits[2].tier, PriceTier::Unit);
        // Entry tier is never cheaper than the best tier
        prop_assert!(benefits[0].price >= benefits[1].price);
        prop_assert!(benefits[1].price >= benefits[2].price);
        // Savings shrink as commitment grows; Unit is the zero baseline
        prop_assert!(benefits[0].savings >= benefits[1].savings);
        prop_assert_eq!(benefits[2].savings, Decimal::ZERO);
    }
}

// ============================================================================
// Property 6: Aggregation dedup vs full sum
// ============================================================================

proptest! {
    #[test]
    fn sales_total_never_exceeds_catalog_total(
        volumes in prop::collection::vec(volume_strategy(), 1..8),
        duplicate_site in any::<bool>(),
    ) {
        let prices = (Decimal::from(100), Decimal::from(110), Decimal::from(120));
        let lots: Vec<InventoryLot> = volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let city = if duplicate_site { "Sorriso".to_string() } else { format!("City{}", i) };
                lot_with_prices("SKU-1", &city, "MT", v, prices)
            })
            .collect();

        let sales = group_for_sales(&lots, today());
        let catalog = products_with_inventory(&lots);
        prop_assert_eq!(sales.len(), 1);
        prop_assert!(sales[0].total_volume <= catalog[0].total_volume);
        prop_assert_eq!(
            catalog[0].total_volume,
            volumes.iter().copied().sum::<Decimal>()
        );
    }
}

#[test]
fn grouping_dedup_worked_example() {
    let prices = (Decimal::from(100), Decimal::from(110), Decimal::from(120));
    let lots = vec![
        lot_with_prices("GLY-480", "Sorriso", "MT", Decimal::from(100), prices),
        lot_with_prices("GLY-480", "Sorriso", "MT", Decimal::from(999), prices),
    ];

    let sales = group_for_sales(&lots, today());
    assert_eq!(sales[0].total_volume, Decimal::from(100));

    let catalog = products_with_inventory(&lots);
    assert_eq!(catalog[0].total_volume, Decimal::from(1099));
}

#[test]
fn empty_inputs_yield_empty_outputs() {
    assert!(price_benefits(&[]).is_empty());
    assert!(group_for_sales(&[], today()).is_empty());
    assert!(products_with_inventory(&[]).is_empty());
}

// ============================================================================
// Property 7: Reservation terminal immutability
// ============================================================================

proptest! {
    #[test]
    fn terminal_states_admit_no_transitions(
        from in prop_oneof![
            Just(ReservationStatus::Consumed),
            Just(ReservationStatus::Cancelled),
            Just(ReservationStatus::Expired),
        ],
        to in prop_oneof![
            Just(ReservationStatus::Active),
            Just(ReservationStatus::Consumed),
            Just(ReservationStatus::Cancelled),
            Just(ReservationStatus::Expired),
        ],
    ) {
        prop_assert!(from.is_terminal());
        prop_assert!(!from.can_transition_to(to));
    }
}
