//! Service health reporting

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Readiness report: the quoting endpoints are pure, so the only
/// dependency worth probing is the reservation/catalog store.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    /// Open connections in the Postgres pool
    pub pool_size: u32,
    /// Connections currently idle in the pool
    pub pool_idle: usize,
}

/// Readiness endpoint; degraded when the reservation store is unreachable
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        pool_size: state.db.size(),
        pool_idle: state.db.num_idle(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            database: "connected".to_string(),
            pool_size: 4,
            pool_idle: 3,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "connected");
        assert_eq!(json["pool_size"], 4);
        assert_eq!(json["pool_idle"], 3);
    }
}
