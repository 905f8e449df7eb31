//! Test-only assertion helpers (spec §6 "Assertions").
//!
//! A [`TestProbe`] is a cheap, clonable window onto a pipeline or bin's
//! stream-boundary bookkeeping, captured with [`crate::pipeline::Pipeline::probe`]
//! or [`crate::bin::Bin::probe`] before the parent core is moved into its
//! own message loop.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct TestProbe {
    observed_sos: Arc<Mutex<HashSet<(String, String)>>>,
    observed_eos: Arc<Mutex<HashSet<(String, String)>>>,
}

impl TestProbe {
    pub(crate) fn new(
        observed_sos: Arc<Mutex<HashSet<(String, String)>>>,
        observed_eos: Arc<Mutex<HashSet<(String, String)>>>,
    ) -> Self {
        Self { observed_sos, observed_eos }
    }

    /// Whether `child` has emitted a `start_of_stream` event whose pad
    /// name contains `pad` since the probe was taken.
    pub fn has_seen_start_of_stream(&self, child: &str, pad: &str) -> bool {
        self.observed_sos.lock().iter().any(|(c, p)| c == child && p.contains(pad))
    }

    pub fn has_seen_end_of_stream(&self, child: &str, pad: &str) -> bool {
        self.observed_eos.lock().iter().any(|(c, p)| c == child && p.contains(pad))
    }

    /// Panics with a diagnostic message if `child` never reported
    /// `start_of_stream` on a pad matching `pad`.
    #[track_caller]
    pub fn assert_start_of_stream(&self, child: &str, pad: &str) {
        assert!(
            self.has_seen_start_of_stream(child, pad),
            "expected start_of_stream from {child}:{pad}, none observed"
        );
    }

    #[track_caller]
    pub fn assert_end_of_stream(&self, child: &str, pad: &str) {
        assert!(
            self.has_seen_end_of_stream(child, pad),
            "expected end_of_stream from {child}:{pad}, none observed"
        );
    }
}
