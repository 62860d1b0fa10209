//! HTTP handlers

mod catalog;
mod health;
mod quoting;
mod reservation;

pub use catalog::*;
pub use health::*;
pub use quoting::*;
pub use reservation::*;
