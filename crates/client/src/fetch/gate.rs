//! Counting admission gate for concurrent operations.
//!
//! Two instances exist at different points in the pipeline: the fetch gate
//! inside [`FetchClient`](super::FetchClient) bounding all network
//! operations, and a per-batch request gate constructed by the transport
//! layer. Leaked permits deadlock future callers, so release is tied to
//! drop rather than left to call sites.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting admission gate with a width fixed at construction.
#[derive(Clone, Debug)]
pub struct RateGate {
    permits: Arc<Semaphore>,
    width: usize,
}

/// An admission permit. Dropping it releases the slot, on every exit path.
#[derive(Debug)]
pub struct RatePermit {
    _permit: OwnedSemaphorePermit,
}

impl RateGate {
    /// Create a gate admitting at most `width` concurrent holders.
    pub fn new(width: usize) -> Self {
        Self { permits: Arc::new(Semaphore::new(width)), width }
    }

    /// Suspend until a permit is free, then take it.
    ///
    /// Never fails and applies no timeout of its own; callers bound the
    /// overall operation, not the wait.
    pub async fn acquire(&self) -> RatePermit {
        // The semaphore is never closed, so acquisition cannot fail.
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("gate semaphore closed");
        RatePermit { _permit: permit }
    }

    /// Number of free permits right now.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Configured width.
    pub fn width(&self) -> usize {
        self.width
    }
}
