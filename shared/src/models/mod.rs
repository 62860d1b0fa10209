//! Domain models for the AgroIkemba trading platform

mod lot;
mod reservation;

pub use lot::*;
pub use reservation::*;
