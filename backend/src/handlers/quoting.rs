//! HTTP handlers for freight and commission quoting endpoints

use axum::{extract::State, Json};
use shared::commission::CommissionQuote;

use crate::error::AppResult;
use crate::services::quoting::{
    BlendedCommissionInput, BlendedCommissionQuote, CommissionQuoteInput, DeliveryEstimate,
    DeliveryEstimateInput, QuotingService,
};
use crate::AppState;

/// Estimate the delivered cost for a route and cargo
pub async fn estimate_delivery(
    State(state): State<AppState>,
    Json(input): Json<DeliveryEstimateInput>,
) -> AppResult<Json<DeliveryEstimate>> {
    let service = QuotingService::new(state.geocoding);
    let estimate = service.delivery_estimate(input).await?;
    Ok(Json(estimate))
}

/// Commission breakdown from base price plus representative overprice
pub async fn quote_commission(
    State(state): State<AppState>,
    Json(input): Json<CommissionQuoteInput>,
) -> AppResult<Json<CommissionQuote>> {
    let service = QuotingService::new(state.geocoding);
    let quote = service.commission_quote(input)?;
    Ok(Json(quote))
}

/// Fixed commission off a blended final price
pub async fn quote_blended_commission(
    State(state): State<AppState>,
    Json(input): Json<BlendedCommissionInput>,
) -> AppResult<Json<BlendedCommissionQuote>> {
    let service = QuotingService::new(state.geocoding);
    let quote = service.blended_commission(input)?;
    Ok(Json(quote))
}
