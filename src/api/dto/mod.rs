//! Request and response DTOs.

pub mod health;
pub mod shorten;
pub mod stats;
