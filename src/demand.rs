//! DemandHandler (spec §4.3): the re-entrance guard and delayed-demand
//! queue around the pull protocol. The actual drain/dispatch logic lives
//! in `element::actor`, which is the only place with simultaneous access
//! to the pad model, the callbacks and peer mailboxes; this type only
//! owns the bookkeeping the spec calls out explicitly.

use crate::pad::PadRef;
use rand::seq::IteratorRandom;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayedAction {
    Supply,
    Redemand,
}

#[derive(Default)]
pub struct DemandHandler {
    supplying_demand: bool,
    delayed_demands: HashSet<(PadRef, DelayedAction)>,
}

impl DemandHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_supplying(&self) -> bool {
        self.supplying_demand
    }

    pub fn begin_supplying(&mut self) {
        debug_assert!(!self.supplying_demand, "re-entrant supply must be deferred, not nested");
        self.supplying_demand = true;
    }

    pub fn end_supplying(&mut self) {
        self.supplying_demand = false;
    }

    pub fn defer(&mut self, pad: PadRef, action: DelayedAction) {
        self.delayed_demands.insert((pad, action));
    }

    pub fn has_delayed(&self) -> bool {
        !self.delayed_demands.is_empty()
    }

    /// Uniformly picks and removes one pending entry (spec §4.3, §9: "must
    /// be a true uniform pick to preserve fairness"). Entries that arrive
    /// while the caller is executing a previous pick are simply folded in
    /// on the next call, since the caller re-invokes this in a loop.
    pub fn pop_random(&mut self) -> Option<(PadRef, DelayedAction)> {
        let mut rng = rand::rng();
        let picked = self.delayed_demands.iter().cloned().choose(&mut rng)?;
        self.delayed_demands.remove(&picked);
        Some(picked)
    }
}
