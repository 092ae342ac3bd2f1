//! Request pacing for the geocoding provider
//!
//! The free Nominatim API allows one request per second, so all outgoing
//! traffic is paced through a single shared [`RequestPacer`]. Waiting is
//! cooperative: callers suspend until their slot comes up, they are never
//! rejected.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Serializes outgoing requests to a minimum inter-request interval
///
/// The next send time is reserved under the lock before the caller
/// sleeps, so overlapping callers chain their slots correctly, and a
/// caller whose future is dropped mid-wait has still consumed its slot.
/// Callers are served in lock acquisition order; this is best-effort
/// FIFO, not a scheduling contract.
#[derive(Debug)]
pub struct RequestPacer {
    /// Earliest instant the next request may be sent
    next_slot: Mutex<Option<Instant>>,
    min_interval: Duration,
    /// Total slots handed out since construction
    request_count: AtomicU64,
}

impl RequestPacer {
    /// Create a pacer with the given minimum interval between requests
    pub fn new(min_interval: Duration) -> Self {
        Self {
            next_slot: Mutex::new(None),
            min_interval,
            request_count: AtomicU64::new(0),
        }
    }

    /// Reserve the next request slot and wait until it arrives
    ///
    /// Returns immediately when the previous request is old enough.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            self.request_count.fetch_add(1, Ordering::Relaxed);
            slot
        };

        let now = Instant::now();
        if slot > now {
            debug!(
                wait_ms = (slot - now).as_millis() as u64,
                "pacing outgoing request"
            );
            tokio::time::sleep_until(slot).await;
        }
    }

    /// Number of request slots handed out so far
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// The configured minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
