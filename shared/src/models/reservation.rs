//! Inventory reservation state machine
//!
//! A reservation is a logical hold on a lot's available volume while a
//! sales proposal is in flight. The hold never decrements the lot until
//! the proposal is approved and the reservation is consumed; cancel and
//! expire simply release the hold.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Reservation lifecycle states
///
/// `Active` is the only non-terminal state. Exactly one outward
/// transition from `Active` is valid; terminal reservations are
/// immutable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Active,
    /// Proposal approved; the hold became a physical stock decrement
    Consumed,
    /// Proposal explicitly rejected; hold released
    Cancelled,
    /// TTL elapsed without resolution; hold released
    Expired,
}

impl ReservationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(self, ReservationStatus::Active) && next.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Consumed => "consumed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ReservationStatus::Active),
            "consumed" => Ok(ReservationStatus::Consumed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "expired" => Ok(ReservationStatus::Expired),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown reservation status: {0}")]
pub struct InvalidStatus(pub String);

/// A hold placed against a specific lot's available volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReservation {
    pub id: Uuid,
    pub lot_id: Uuid,
    /// Owning CRM opportunity, when the proposal came from one
    pub opportunity_id: Option<Uuid>,
    pub proposal_id: Uuid,
    pub reserved_volume: Decimal,
    pub status: ReservationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Set when the reservation reached a terminal state
    pub resolved_at: Option<DateTime<Utc>>,
}

impl InventoryReservation {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Active && self.expires_at < now
    }
}

/// Terminal-state counts used for conversion reporting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionMetrics {
    pub consumed_count: i64,
    pub expired_count: i64,
    pub cancelled_count: i64,
}

impl ConversionMetrics {
    /// `consumed / (consumed + expired) * 100`
    ///
    /// Cancelled reservations are excluded: a representative who walks
    /// away from a proposal is not counted as a lost conversion. `None`
    /// when no reservation has resolved either way yet.
    pub fn conversion_rate(&self) -> Option<Decimal> {
        let denominator = self.consumed_count + self.expired_count;
        if denominator == 0 {
            return None;
        }
        Some(Decimal::from(self.consumed_count) / Decimal::from(denominator) * Decimal::from(100))
    }

    /// Stricter variant counting cancelled proposals as lost as well
    pub fn conversion_rate_with_cancelled(&self) -> Option<Decimal> {
        let denominator = self.consumed_count + self.expired_count + self.cancelled_count;
        if denominator == 0 {
            return None;
        }
        Some(Decimal::from(self.consumed_count) / Decimal::from(denominator) * Decimal::from(100))
    }
}
