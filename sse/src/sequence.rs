use std::sync::atomic::{AtomicU64, Ordering};

/// Value the counter holds before any event has been numbered.
const INITIAL_SEQUENCE: u64 = 1;

/// Monotonic event id generator.
///
/// Each `Broadcaster` owns exactly one counter, shared by all of its groups.
/// Two broadcasters in the same process number their events independently,
/// so ids are only comparable between events of the same instance.
#[derive(Debug)]
pub struct SequenceCounter {
    value: AtomicU64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(INITIAL_SEQUENCE),
        }
    }

    /// Advance the counter and return the new value. The first call returns 2.
    pub fn next_id(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Last value handed out (or the initial value if none was).
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}
