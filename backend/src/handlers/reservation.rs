//! HTTP handlers for reservation lifecycle endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{ConversionMetrics, InventoryReservation};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::reservation::{CreateReservationInput, ReservationService};
use crate::AppState;

/// Place a hold against a lot for an in-flight proposal
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(input): Json<CreateReservationInput>,
) -> AppResult<Json<InventoryReservation>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let reservation = service.create(input).await?;
    Ok(Json(reservation))
}

/// Get a reservation
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<Json<InventoryReservation>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let reservation = service.get(reservation_id).await?;
    Ok(Json(reservation))
}

/// List reservations for a lot
pub async fn list_lot_reservations(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryReservation>>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let reservations = service.list_for_lot(lot_id).await?;
    Ok(Json(reservations))
}

/// Consume a reservation after its proposal was approved
pub async fn consume_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<Json<InventoryReservation>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let reservation = service.consume(reservation_id).await?;
    Ok(Json(reservation))
}

/// Cancel a reservation after its proposal was rejected
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<Json<InventoryReservation>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let reservation = service.cancel(reservation_id).await?;
    Ok(Json(reservation))
}

/// Expire overdue reservations immediately (admin/testing trigger)
pub async fn run_expiry_sweep(
    State(state): State<AppState>,
) -> AppResult<Json<ExpirySweepResponse>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let expired_count = service.expire_due(chrono::Utc::now()).await?;
    Ok(Json(ExpirySweepResponse { expired_count }))
}

/// Conversion reporting: consumed vs lost reservations
pub async fn get_conversion_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<ConversionReport>> {
    let service = ReservationService::new(state.db, state.config.reservations.default_ttl_hours);
    let metrics = service.conversion_metrics().await?;
    Ok(Json(ConversionReport {
        conversion_rate: metrics.conversion_rate(),
        conversion_rate_with_cancelled: metrics.conversion_rate_with_cancelled(),
        metrics,
    }))
}

/// Response for the manual sweep trigger
#[derive(Debug, Serialize)]
pub struct ExpirySweepResponse {
    pub expired_count: u64,
}

/// Both conversion-rate variants; the consumer picks its policy
#[derive(Debug, Serialize)]
pub struct ConversionReport {
    #[serde(flatten)]
    pub metrics: ConversionMetrics,
    pub conversion_rate: Option<Decimal>,
    pub conversion_rate_with_cancelled: Option<Decimal>,
}
