//! DTO for the health endpoint.

use serde::Serialize;

/// Liveness response with click-queue headroom.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Free slots in the click-event queue.
    pub click_queue_free: usize,
    pub click_queue_capacity: usize,
}
