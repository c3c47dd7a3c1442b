//! Single-slot in-flight tracker for breakdown requests
//!
//! At most one breakdown may be outstanding. A request made while the slot is
//! taken is dropped, not queued. The slot frees when the permit is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Tracks whether a breakdown request is in flight
#[derive(Debug, Clone, Default)]
pub struct BreakdownGate {
    busy: Arc<AtomicBool>,
}

/// Proof that the holder owns the in-flight slot
#[derive(Debug)]
pub struct BreakdownPermit {
    busy: Arc<AtomicBool>,
}

impl BreakdownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot, or None if a request is already in flight
    pub fn try_acquire(&self) -> Option<BreakdownPermit> {
        match self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                debug!("try_acquire: slot taken");
                Some(BreakdownPermit {
                    busy: Arc::clone(&self.busy),
                })
            }
            Err(_) => {
                debug!("try_acquire: busy, request dropped");
                None
            }
        }
    }

    /// True while a request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for BreakdownPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        debug!("BreakdownPermit: slot released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_dropped() {
        let gate = BreakdownGate::new();
        let permit = gate.try_acquire();
        assert!(permit.is_some());
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let gate = BreakdownGate::new();
        let other = gate.clone();

        let _permit = gate.try_acquire().unwrap();
        assert!(other.is_busy());
        assert!(other.try_acquire().is_none());
    }
}
