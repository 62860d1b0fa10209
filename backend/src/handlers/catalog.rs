//! HTTP handlers for catalog and aggregation endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::grouping::{GroupedProduct, ProductInventory};
use shared::models::InventoryLot;
use shared::pricing::TierBenefit;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::catalog::{CatalogService, CreateLotInput};
use crate::AppState;

/// Create an inventory lot (import/admin entry)
pub async fn create_lot(
    State(state): State<AppState>,
    Json(input): Json<CreateLotInput>,
) -> AppResult<Json<InventoryLot>> {
    let service = CatalogService::new(state.db);
    let lot = service.create_lot(input).await?;
    Ok(Json(lot))
}

/// Get a single lot
pub async fn get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<InventoryLot>> {
    let service = CatalogService::new(state.db);
    let lot = service.get_lot(lot_id).await?;
    Ok(Json(lot))
}

/// List all lots
pub async fn list_lots(State(state): State<AppState>) -> AppResult<Json<Vec<InventoryLot>>> {
    let service = CatalogService::new(state.db);
    let lots = service.list_lots().await?;
    Ok(Json(lots))
}

/// Sales view: grouped products with location-deduplicated volumes
pub async fn get_grouped_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GroupedProduct>>> {
    let service = CatalogService::new(state.db);
    let grouped = service.grouped_for_sales().await?;
    Ok(Json(grouped))
}

/// Catalog view: full per-SKU volume sums
pub async fn get_catalog_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductInventory>>> {
    let service = CatalogService::new(state.db);
    let inventory = service.catalog_inventory().await?;
    Ok(Json(inventory))
}

/// Price ladder for one SKU
pub async fn get_price_benefits(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<Vec<TierBenefit>>> {
    let service = CatalogService::new(state.db);
    let benefits = service.price_benefits_for_sku(&sku).await?;
    Ok(Json(benefits))
}
