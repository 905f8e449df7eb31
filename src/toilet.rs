//! Push-mode overflow guard (spec §3 "Toilet", §4.3).
//!
//! Exactly one producer adds and exactly one consumer subtracts, so — just
//! like the teacher crate's SPSC cursors — plain `Acquire`/`Release` atomics
//! suffice; no CAS loop is needed.

use crossbeam_utils::CachePadded;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Shared counter of outstanding unconsumed units buffered at a push-mode
/// input pad.
#[derive(Debug)]
pub struct Toilet {
    level: CachePadded<AtomicI64>,
    threshold: i64,
}

impl Toilet {
    pub fn new(threshold: i64) -> Arc<Self> {
        Arc::new(Self {
            level: CachePadded::new(AtomicI64::new(0)),
            threshold,
        })
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn level(&self) -> i64 {
        self.level.load(Ordering::Acquire)
    }

    /// Producer side: add `units` to the outstanding count. Returns the new
    /// level so the caller can decide whether to kill the producer.
    pub fn add(&self, units: i64) -> i64 {
        self.level.fetch_add(units, Ordering::AcqRel) + units
    }

    /// Consumer side: subtract exactly what was drained. Never goes
    /// negative (spec invariant): a consumer draining more than was ever
    /// added is a logic error in the caller, not something the toilet
    /// should silently clamp away from zero in the other direction either,
    /// so we saturate defensively but this path is not expected to trigger.
    pub fn sub(&self, units: i64) {
        let mut current = self.level.load(Ordering::Acquire);
        loop {
            let next = (current - units).max(0);
            match self.level.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    pub fn is_overflowing(&self) -> bool {
        self.level() > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_overflow() {
        let t = Toilet::new(200);
        for _ in 0..201 {
            t.add(1);
        }
        assert!(t.is_overflowing());
        assert_eq!(t.level(), 201);
    }

    #[test]
    fn sub_never_goes_negative() {
        let t = Toilet::new(200);
        t.add(3);
        t.sub(10);
        assert_eq!(t.level(), 0);
    }

    #[test]
    fn exact_threshold_does_not_overflow() {
        let t = Toilet::new(200);
        t.add(200);
        assert!(!t.is_overflowing());
        t.add(1);
        assert!(t.is_overflowing());
    }
}
