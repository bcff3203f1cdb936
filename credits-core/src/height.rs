use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the host-supplied monotonically increasing height counter used
/// to timestamp verification, issuance, and redemption.
///
/// The ledger only reads heights; advancing the counter is the host's job.
pub trait HeightSource: Send + Sync {
    fn current_height(&self) -> u64;
}

/// Height source backed by an atomic counter the host advances as its own
/// notion of height moves forward.
#[derive(Debug, Default)]
pub struct HostHeight(AtomicU64);

impl HostHeight {
    pub fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    /// Advances the counter by one and returns the new height.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn set(&self, height: u64) {
        self.0.store(height, Ordering::SeqCst);
    }
}

impl HeightSource for HostHeight {
    fn current_height(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
