use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter for one data slot (e.g. "the bookings table").
///
/// Each request takes a ticket with [`begin`](Self::begin); when the response
/// arrives it is applied only if no newer request was started meanwhile.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate every outstanding ticket without issuing a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
