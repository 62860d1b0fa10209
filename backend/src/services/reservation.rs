//! Reservation lifecycle service
//!
//! Persists the inventory reservation state machine. A reservation is a
//! logical hold: availability is only physically decremented when the
//! hold is consumed. The one real race in the system lives here --
//! concurrent proposals reserving from the same lot -- so reservation
//! creation locks the lot row and re-checks the outstanding holds inside
//! the transaction. Cancel and expire are idempotent against terminal
//! reservations, which lets the periodic sweep run safely alongside
//! manual rejections.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{ConversionMetrics, InventoryReservation, ReservationStatus};
use shared::validation::{validate_reservation_ttl, validate_reserved_volume};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reservation service over the Postgres backing store
#[derive(Clone)]
pub struct ReservationService {
    db: PgPool,
    default_ttl_hours: i64,
}

/// Database row for a reservation
#[derive(Debug, FromRow)]
struct ReservationRow {
    id: Uuid,
    lot_id: Uuid,
    opportunity_id: Option<Uuid>,
    proposal_id: Uuid,
    reserved_volume: Decimal,
    status: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for InventoryReservation {
    type Error = AppError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status: ReservationStatus = row
            .status
            .parse()
            .map_err(|e| AppError::Internal(format!("corrupt reservation row: {}", e)))?;
        Ok(InventoryReservation {
            id: row.id,
            lot_id: row.lot_id,
            opportunity_id: row.opportunity_id,
            proposal_id: row.proposal_id,
            reserved_volume: row.reserved_volume,
            status,
            expires_at: row.expires_at,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

const RESERVATION_COLUMNS: &str = "id, lot_id, opportunity_id, proposal_id, reserved_volume, \
    status, expires_at, created_at, resolved_at";

/// Input for placing a hold against a lot
#[derive(Debug, Deserialize)]
pub struct CreateReservationInput {
    pub lot_id: Uuid,
    pub proposal_id: Uuid,
    pub opportunity_id: Option<Uuid>,
    pub reserved_volume: Decimal,
    /// Hours until the hold lapses; server default when omitted
    pub ttl_hours: Option<i64>,
}

impl ReservationService {
    pub fn new(db: PgPool, default_ttl_hours: i64) -> Self {
        Self {
            db,
            default_ttl_hours,
        }
    }

    /// Place a hold on a lot's available volume
    ///
    /// Atomic check-and-reserve: the lot row is locked for the duration
    /// of the transaction and the sum of active holds is re-read under
    /// that lock, so two concurrent proposals can never jointly exceed
    /// the lot's availability. The later one fails with
    /// [`AppError::InsufficientVolume`]; retrying is the caller's call.
    pub async fn create(&self, input: CreateReservationInput) -> AppResult<InventoryReservation> {
        validate_reserved_volume(input.reserved_volume)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        let created_at = Utc::now();
        let ttl_hours = input.ttl_hours.unwrap_or(self.default_ttl_hours);
        let expires_at = created_at + chrono::Duration::hours(ttl_hours);
        validate_reservation_ttl(created_at, expires_at)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        let available: Decimal = sqlx::query_scalar(
            "SELECT volume_available FROM inventory_lots WHERE id = $1 FOR UPDATE",
        )
        .bind(input.lot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        let held: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(reserved_volume), 0)
            FROM inventory_reservations
            WHERE lot_id = $1 AND status = 'active'
            "#,
        )
        .bind(input.lot_id)
        .fetch_one(&mut *tx)
        .await?;

        let remaining = available - held;
        if input.reserved_volume > remaining {
            return Err(AppError::InsufficientVolume {
                requested: input.reserved_volume,
                available: remaining,
            });
        }

        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
            INSERT INTO inventory_reservations (
                id, lot_id, opportunity_id, proposal_id, reserved_volume,
                status, expires_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $7)
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.lot_id)
        .bind(input.opportunity_id)
        .bind(input.proposal_id)
        .bind(input.reserved_volume)
        .bind(expires_at)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = %row.id,
            lot_id = %input.lot_id,
            volume = %input.reserved_volume,
            "Reservation created"
        );
        row.try_into()
    }

    /// Get a reservation
    pub async fn get(&self, reservation_id: Uuid) -> AppResult<InventoryReservation> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {} FROM inventory_reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(reservation_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation".to_string()))?;

        row.try_into()
    }

    /// List reservations holding volume against a lot
    pub async fn list_for_lot(&self, lot_id: Uuid) -> AppResult<Vec<InventoryReservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {} FROM inventory_reservations WHERE lot_id = $1 ORDER BY created_at, id",
            RESERVATION_COLUMNS
        ))
        .bind(lot_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Convert an approved proposal's hold into a physical decrement
    ///
    /// Only an active reservation can be consumed; consuming a terminal
    /// one is an invalid transition, not a no-op, because it would imply
    /// a double stock decrement.
    pub async fn consume(&self, reservation_id: Uuid) -> AppResult<InventoryReservation> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
            UPDATE inventory_reservations
            SET status = 'consumed', resolved_at = $2
            WHERE id = $1 AND status = 'active'
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(reservation_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                // Either missing or already terminal; report which
                let existing = self.get(reservation_id).await?;
                return Err(AppError::InvalidStateTransition(format!(
                    "cannot consume a {} reservation",
                    existing.status
                )));
            }
        };

        let available: Decimal = sqlx::query_scalar(
            "SELECT volume_available FROM inventory_lots WHERE id = $1 FOR UPDATE",
        )
        .bind(row.lot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        // Creation-time guard makes this unreachable unless the lot was
        // adjusted downward while the hold was active
        if available < row.reserved_volume {
            return Err(AppError::InsufficientVolume {
                requested: row.reserved_volume,
                available,
            });
        }

        sqlx::query("UPDATE inventory_lots SET volume_available = volume_available - $2 WHERE id = $1")
            .bind(row.lot_id)
            .bind(row.reserved_volume)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation_id,
            lot_id = %row.lot_id,
            volume = %row.reserved_volume,
            "Reservation consumed; lot volume decremented"
        );
        row.try_into()
    }

    /// Release a hold after an explicit proposal rejection
    ///
    /// Idempotent: cancelling an already-terminal reservation (for
    /// example after the expiry sweep got there first) returns it
    /// unchanged. The hold was never a physical decrement, so there is
    /// nothing to restore.
    pub async fn cancel(&self, reservation_id: Uuid) -> AppResult<InventoryReservation> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
            UPDATE inventory_reservations
            SET status = 'cancelled', resolved_at = $2
            WHERE id = $1 AND status = 'active'
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(reservation_id)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => {
                let existing = self.get(reservation_id).await?;
                tracing::debug!(
                    reservation_id = %reservation_id,
                    status = %existing.status,
                    "Cancel on terminal reservation ignored"
                );
                Ok(existing)
            }
        }
    }

    /// Mark every overdue active reservation as expired
    ///
    /// Safe to run concurrently with cancel/consume: the status guard in
    /// the WHERE clause means a reservation resolved elsewhere is simply
    /// skipped, never double-released.
    pub async fn expire_due(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_reservations
            SET status = 'expired', resolved_at = $1
            WHERE status = 'active' AND expires_at < $1
            "#,
        )
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// Terminal-state counts for conversion reporting
    pub async fn conversion_metrics(&self) -> AppResult<ConversionMetrics> {
        let (consumed, expired, cancelled): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'consumed'),
                COUNT(*) FILTER (WHERE status = 'expired'),
                COUNT(*) FILTER (WHERE status = 'cancelled')
            FROM inventory_reservations
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(ConversionMetrics {
            consumed_count: consumed,
            expired_count: expired,
            cancelled_count: cancelled,
        })
    }
}

/// Periodic background task expiring overdue reservations
///
/// The in-progress flag is instance state, not a module global, so
/// independent sweepers (tests, multi-tenant deployments) never
/// interfere with each other.
pub struct ExpirySweeper {
    service: ReservationService,
    interval: Duration,
    in_progress: AtomicBool,
}

impl ExpirySweeper {
    pub fn new(service: ReservationService, interval: Duration) -> Self {
        Self {
            service,
            interval,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Run the sweep loop forever; intended for `tokio::spawn`
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep_once().await {
                tracing::error!(error = %e, "Reservation expiry sweep failed");
            }
        }
    }

    /// One sweep pass; skipped when a previous pass is still running
    pub async fn sweep_once(&self) -> AppResult<u64> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            tracing::debug!("Expiry sweep already in progress, skipping");
            return Ok(0);
        }

        let result = self.service.expire_due(Utc::now()).await;
        self.in_progress.store(false, Ordering::SeqCst);

        let expired = result?;
        if expired > 0 {
            tracing::info!(count = expired, "Expired overdue reservations");
        }
        Ok(expired)
    }
}
