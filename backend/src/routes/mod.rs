//! Route definitions for the AgroIkemba trading backend

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog and aggregation
        .nest("/catalog", catalog_routes())
        // Freight and commission quoting
        .nest("/quotes", quoting_routes())
        // Reservation lifecycle
        .nest("/reservations", reservation_routes())
}

/// Catalog routes: lots and their aggregate views
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/lots", get(handlers::list_lots).post(handlers::create_lot))
        .route("/lots/:lot_id", get(handlers::get_lot))
        .route(
            "/lots/:lot_id/reservations",
            get(handlers::list_lot_reservations),
        )
        // Sales display: deduplicated per-location volumes
        .route("/grouped", get(handlers::get_grouped_products))
        // Technical catalog: full volume sums
        .route("/inventory", get(handlers::get_catalog_inventory))
        .route("/:sku/price-benefits", get(handlers::get_price_benefits))
}

/// Quoting routes
fn quoting_routes() -> Router<AppState> {
    Router::new()
        .route("/freight", post(handlers::estimate_delivery))
        .route("/commission", post(handlers::quote_commission))
        .route(
            "/commission/blended",
            post(handlers::quote_blended_commission),
        )
}

/// Reservation lifecycle routes
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_reservation))
        .route("/:reservation_id", get(handlers::get_reservation))
        .route("/:reservation_id/consume", post(handlers::consume_reservation))
        .route("/:reservation_id/cancel", post(handlers::cancel_reservation))
        .route("/sweep", post(handlers::run_expiry_sweep))
        .route("/metrics/conversion", get(handlers::get_conversion_metrics))
}
