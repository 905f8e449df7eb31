//! Bounded, order-preserving queue per input pad (spec §4.2).

use crate::buffer::Buffer;
use crate::caps::Caps;
use crate::event::Event;
use crate::pad::DemandUnit;
use std::collections::VecDeque;

/// One entry in an [`InputBuffer`]. Caps and events are never reordered
/// relative to the buffers around them.
pub enum QueueItem {
    Caps(Caps),
    Event(Event),
    Buffers(Vec<Buffer>),
}

/// Whether a drain satisfied the requested demand before the queue ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStatus {
    Drained,
    Empty,
}

pub struct InputBuffer {
    items: VecDeque<QueueItem>,
    unit: DemandUnit,
    /// Units already requested from the peer and not yet delivered.
    outstanding_request: u64,
    preferred_size: u64,
}

impl InputBuffer {
    pub fn new(unit: DemandUnit, preferred_size: u64) -> Self {
        Self {
            items: VecDeque::new(),
            unit,
            outstanding_request: 0,
            preferred_size,
        }
    }

    pub fn store(&mut self, item: QueueItem) {
        self.items.push_back(item);
    }

    /// Units of buffered (not caps/event) data currently queued.
    fn buffered_units(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item {
                QueueItem::Buffers(bs) => self.unit.size(bs),
                _ => 0,
            })
            .sum()
    }

    /// Drains items from the head until either the queue is empty or
    /// `current_demand` buffer units have been removed. Returns the drained
    /// items in order, the drain status, and — if the remaining queue sits
    /// below `preferred_size` — the deficit that should be requested from
    /// the peer.
    pub fn take_and_demand(&mut self, current_demand: u64) -> (DrainStatus, Vec<QueueItem>, Option<u64>) {
        let mut drained = Vec::new();
        let mut units_drained = 0u64;

        let status = loop {
            if units_drained >= current_demand {
                break DrainStatus::Drained;
            }
            let Some(item) = self.items.pop_front() else {
                break DrainStatus::Empty;
            };
            if let QueueItem::Buffers(bs) = &item {
                units_drained += self.unit.size(bs);
            }
            drained.push(item);
        };

        let remaining = self.buffered_units();
        let deficit = if remaining < self.preferred_size {
            let deficit = self.preferred_size - remaining;
            self.outstanding_request += deficit;
            Some(deficit)
        } else {
            None
        };

        (status, drained, deficit)
    }

    /// Called when the peer fulfills a previously requested deficit.
    pub fn acknowledge_delivery(&mut self, units: u64) {
        self.outstanding_request = self.outstanding_request.saturating_sub(units);
    }

    pub fn outstanding_request(&self) -> u64 {
        self.outstanding_request
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(n: usize) -> Vec<Buffer> {
        (0..n).map(|_| Buffer::new(&b"x"[..])).collect()
    }

    #[test]
    fn drains_in_insertion_order() {
        let mut ib = InputBuffer::new(DemandUnit::Buffers, 10);
        ib.store(QueueItem::Caps(Caps::new("audio/x-raw")));
        ib.store(QueueItem::Buffers(buf(2)));
        ib.store(QueueItem::Event(Event::EndOfStream));

        let (status, drained, _) = ib.take_and_demand(2);
        assert_eq!(status, DrainStatus::Drained);
        assert_eq!(drained.len(), 3);
        assert!(matches!(drained[0], QueueItem::Caps(_)));
        assert!(matches!(drained[1], QueueItem::Buffers(_)));
        assert!(matches!(drained[2], QueueItem::Event(Event::EndOfStream)));
    }

    #[test]
    fn empty_status_when_queue_exhausted_before_demand_met() {
        let mut ib = InputBuffer::new(DemandUnit::Buffers, 10);
        ib.store(QueueItem::Buffers(buf(2)));
        let (status, drained, _) = ib.take_and_demand(5);
        assert_eq!(status, DrainStatus::Empty);
        assert_eq!(drained.len(), 1);
    }

    #[test]
    fn non_buffer_items_never_count_toward_budget() {
        let mut ib = InputBuffer::new(DemandUnit::Buffers, 10);
        for _ in 0..5 {
            ib.store(QueueItem::Event(Event::StartOfStream));
        }
        ib.store(QueueItem::Buffers(buf(1)));
        let (status, drained, _) = ib.take_and_demand(1);
        assert_eq!(status, DrainStatus::Drained);
        assert_eq!(drained.len(), 6);
    }

    #[test]
    fn requests_deficit_below_preferred_size() {
        let mut ib = InputBuffer::new(DemandUnit::Buffers, 10);
        ib.store(QueueItem::Buffers(buf(2)));
        let (_, _, deficit) = ib.take_and_demand(2);
        assert_eq!(deficit, Some(10));
    }

    #[test]
    fn no_request_when_above_preferred_size() {
        let mut ib = InputBuffer::new(DemandUnit::Buffers, 2);
        ib.store(QueueItem::Buffers(buf(5)));
        let (_, _, deficit) = ib.take_and_demand(1);
        assert_eq!(deficit, None);
    }
}
