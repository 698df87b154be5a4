//! HTTP handlers.

mod health;
mod redirect;
mod shorten;
mod stats;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::{ACCOUNT_ID_HEADER, shorten_handler};
pub use stats::stats_handler;
