//! Business logic services

pub mod catalog;
pub mod quoting;
pub mod reservation;
