//! Catalog service for inventory lots and their aggregate views
//!
//! Owns lot persistence and exposes the two aggregation views (sales
//! grouping with location dedup, full catalog sums) plus the per-SKU
//! price ladder. Lots are always read in `created_at, id` order so the
//! "first lot wins" contracts in the shared calculators resolve
//! deterministically.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::grouping::{group_for_sales, products_with_inventory, GroupedProduct, ProductInventory};
use shared::models::InventoryLot;
use shared::pricing::{price_benefits, TierBenefit};
use shared::validation::validate_lot;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Catalog service for lots and grouped product views
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Database row for an inventory lot
#[derive(Debug, FromRow)]
struct LotRow {
    id: Uuid,
    sku: String,
    product_name: String,
    city: String,
    state: String,
    volume_available: Decimal,
    unit_price: Decimal,
    band_lower_price: Decimal,
    band_upper_price: Decimal,
    band_lower_min_volume: Option<Decimal>,
    unit_min_volume: Option<Decimal>,
    commission_per_unit: Decimal,
    net_commission: Decimal,
    commission_percentage: Decimal,
    rep_percentage: Decimal,
    supplier_net: Decimal,
    expiry_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<LotRow> for InventoryLot {
    fn from(row: LotRow) -> Self {
        InventoryLot {
            id: row.id,
            sku: row.sku,
            product_name: row.product_name,
            city: row.city,
            state: row.state,
            volume_available: row.volume_available,
            unit_price: row.unit_price,
            band_lower_price: row.band_lower_price,
            band_upper_price: row.band_upper_price,
            band_lower_min_volume: row.band_lower_min_volume,
            unit_min_volume: row.unit_min_volume,
            commission_per_unit: row.commission_per_unit,
            net_commission: row.net_commission,
            commission_percentage: row.commission_percentage,
            rep_percentage: row.rep_percentage,
            supplier_net: row.supplier_net,
            expiry_date: row.expiry_date,
            created_at: row.created_at,
        }
    }
}

const LOT_COLUMNS: &str = "id, sku, product_name, city, state, volume_available, \
    unit_price, band_lower_price, band_upper_price, band_lower_min_volume, unit_min_volume, \
    commission_per_unit, net_commission, commission_percentage, rep_percentage, supplier_net, \
    expiry_date, created_at";

/// Input for creating an inventory lot (import/admin entry)
#[derive(Debug, Deserialize)]
pub struct CreateLotInput {
    pub sku: String,
    pub product_name: String,
    pub city: String,
    pub state: String,
    pub volume_available: Decimal,
    pub unit_price: Decimal,
    pub band_lower_price: Decimal,
    pub band_upper_price: Decimal,
    pub band_lower_min_volume: Option<Decimal>,
    pub unit_min_volume: Option<Decimal>,
    pub commission_per_unit: Decimal,
    pub net_commission: Decimal,
    pub commission_percentage: Decimal,
    pub rep_percentage: Decimal,
    pub supplier_net: Decimal,
    pub expiry_date: Option<NaiveDate>,
}

impl CatalogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a lot from inventory import or admin entry
    pub async fn create_lot(&self, input: CreateLotInput) -> AppResult<InventoryLot> {
        let candidate = InventoryLot {
            id: Uuid::new_v4(),
            sku: input.sku,
            product_name: input.product_name,
            city: input.city,
            state: input.state,
            volume_available: input.volume_available,
            unit_price: input.unit_price,
            band_lower_price: input.band_lower_price,
            band_upper_price: input.band_upper_price,
            band_lower_min_volume: input.band_lower_min_volume,
            unit_min_volume: input.unit_min_volume,
            commission_per_unit: input.commission_per_unit,
            net_commission: input.net_commission,
            commission_percentage: input.commission_percentage,
            rep_percentage: input.rep_percentage,
            supplier_net: input.supplier_net,
            expiry_date: input.expiry_date,
            created_at: Utc::now(),
        };
        validate_lot(&candidate).map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        let row = sqlx::query_as::<_, LotRow>(&format!(
            r#"
            INSERT INTO inventory_lots (
                id, sku, product_name, city, state, volume_available,
                unit_price, band_lower_price, band_upper_price,
                band_lower_min_volume, unit_min_volume,
                commission_per_unit, net_commission, commission_percentage,
                rep_percentage, supplier_net, expiry_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {}
            "#,
            LOT_COLUMNS
        ))
        .bind(candidate.id)
        .bind(&candidate.sku)
        .bind(&candidate.product_name)
        .bind(&candidate.city)
        .bind(&candidate.state)
        .bind(candidate.volume_available)
        .bind(candidate.unit_price)
        .bind(candidate.band_lower_price)
        .bind(candidate.band_upper_price)
        .bind(candidate.band_lower_min_volume)
        .bind(candidate.unit_min_volume)
        .bind(candidate.commission_per_unit)
        .bind(candidate.net_commission)
        .bind(candidate.commission_percentage)
        .bind(candidate.rep_percentage)
        .bind(candidate.supplier_net)
        .bind(candidate.expiry_date)
        .bind(candidate.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a single lot
    pub async fn get_lot(&self, lot_id: Uuid) -> AppResult<InventoryLot> {
        let row = sqlx::query_as::<_, LotRow>(&format!(
            "SELECT {} FROM inventory_lots WHERE id = $1",
            LOT_COLUMNS
        ))
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        Ok(row.into())
    }

    /// List all lots in deterministic creation order
    pub async fn list_lots(&self) -> AppResult<Vec<InventoryLot>> {
        let rows = sqlx::query_as::<_, LotRow>(&format!(
            "SELECT {} FROM inventory_lots ORDER BY created_at, id",
            LOT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Sales view: lots grouped per SKU with location-deduplicated volume
    pub async fn grouped_for_sales(&self) -> AppResult<Vec<GroupedProduct>> {
        let lots = self.list_lots().await?;
        Ok(group_for_sales(&lots, Utc::now().date_naive()))
    }

    /// Catalog view: plain per-SKU volume sums across every lot row
    pub async fn catalog_inventory(&self) -> AppResult<Vec<ProductInventory>> {
        let lots = self.list_lots().await?;
        Ok(products_with_inventory(&lots))
    }

    /// Price ladder for one SKU, sourced from its oldest sellable lot
    pub async fn price_benefits_for_sku(&self, sku: &str) -> AppResult<Vec<TierBenefit>> {
        let rows = sqlx::query_as::<_, LotRow>(&format!(
            r#"
            SELECT {}
            FROM inventory_lots
            WHERE sku = $1 AND (expiry_date IS NULL OR expiry_date >= $2)
            ORDER BY created_at, id
            "#,
            LOT_COLUMNS
        ))
        .bind(sku)
        .bind(Utc::now().date_naive())
        .fetch_all(&self.db)
        .await?;

        let lots: Vec<InventoryLot> = rows.into_iter().map(Into::into).collect();
        Ok(price_benefits(&lots))
    }
}
