//! Shared types and calculators for the AgroIkemba trading platform
//!
//! This crate contains the pure pricing, freight, commission, and
//! inventory-aggregation logic shared between the backend, the frontend
//! (via WASM), and other components of the system. Nothing in here does
//! I/O; all inputs are supplied by the caller.

pub mod commission;
pub mod freight;
pub mod geo;
pub mod grouping;
pub mod models;
pub mod pricing;
pub mod types;
pub mod validation;

pub use commission::*;
pub use freight::*;
pub use geo::*;
pub use grouping::*;
pub use models::*;
pub use pricing::*;
pub use types::*;
pub use validation::*;
