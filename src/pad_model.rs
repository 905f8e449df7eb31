//! Per-pad state record store (spec §4.1).
//!
//! All accesses happen inside the owning element's task, so — exactly as
//! for the teacher crate's ring buffer indices, which are touched by only
//! one side of the channel at a time — no locking is required here.

use crate::caps::{Caps, CapsConstraint};
use crate::error::UnknownPad;
use crate::input_buffer::InputBuffer;
use crate::pad::{DemandUnit, Direction, Mode, PadInfo, PadRef};
use crate::toilet::Toilet;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Identity of the other end of a link, from this pad's point of view.
#[derive(Debug, Clone)]
pub struct PeerRef {
    pub pad: PadRef,
    pub mailbox: flume::Sender<crate::message::ToElement>,
    /// Set only when linking a push-mode output to a push-mode input: the
    /// consumer's toilet handle, so the producer can charge it directly
    /// (spec §4.3 "outgoing buffers accounting").
    pub toilet: Option<Arc<Toilet>>,
}

/// Everything the runtime tracks about one pad.
pub struct PadRecord {
    pub direction: Direction,
    pub mode: Mode,
    pub caps_constraint: CapsConstraint,
    pub demand_unit: DemandUnit,
    pub negotiated_caps: Option<Caps>,
    pub peer: Option<PeerRef>,
    pub demand: i64,
    pub input_buffer: Option<InputBuffer>,
    /// Owned toilet, for push-mode *input* pads only.
    pub toilet: Option<Arc<Toilet>>,
    /// Handle to the downstream peer's toilet, for push-mode *output*
    /// pads only — set during linking so outgoing buffers can be charged
    /// against it (spec §4.3 "outgoing buffers accounting").
    pub peer_toilet: Option<Arc<Toilet>>,
    pub caps_sent: bool,
    pub start_of_stream_sent: bool,
    pub end_of_stream_sent: bool,
    custom: HashMap<String, Box<dyn Any + Send>>,
}

impl PadRecord {
    fn from_info(info: &PadInfo, toilet_threshold: i64) -> Self {
        // Only pull-mode input pads drain through demand accounting; a
        // push-mode input pad is dispatched to as soon as buffers arrive
        // and is guarded by its toilet instead.
        let input_buffer = (matches!(info.direction, Direction::Input)
            && matches!(info.mode, Mode::Pull))
        .then(|| InputBuffer::new(info.demand_unit.clone(), info.preferred_size));
        let toilet = (matches!(info.direction, Direction::Input)
            && matches!(info.mode, Mode::Push))
        .then(|| Toilet::new(info.toilet_threshold.unwrap_or(toilet_threshold)));

        Self {
            direction: info.direction,
            mode: info.mode,
            caps_constraint: info.caps.clone(),
            demand_unit: info.demand_unit.clone(),
            negotiated_caps: None,
            peer: None,
            demand: 0,
            input_buffer,
            toilet,
            peer_toilet: None,
            caps_sent: false,
            start_of_stream_sent: false,
            end_of_stream_sent: false,
            custom: HashMap::new(),
        }
    }
}

/// Keyed store of per-pad records within one element.
#[derive(Default)]
pub struct PadModel {
    pads: HashMap<PadRef, PadRecord>,
}

impl PadModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pad: PadRef, info: &PadInfo, toilet_threshold: i64) {
        self.pads.insert(pad, PadRecord::from_info(info, toilet_threshold));
    }

    pub fn get(&self, pad: &PadRef) -> Result<&PadRecord, UnknownPad> {
        self.pads.get(pad).ok_or_else(|| UnknownPad(pad.clone()))
    }

    pub fn get_mut(&mut self, pad: &PadRef) -> Result<&mut PadRecord, UnknownPad> {
        self.pads.get_mut(pad).ok_or_else(|| UnknownPad(pad.clone()))
    }

    pub fn update<F, R>(&mut self, pad: &PadRef, f: F) -> Result<R, UnknownPad>
    where
        F: FnOnce(&mut PadRecord) -> R,
    {
        Ok(f(self.get_mut(pad)?))
    }

    pub fn contains(&self, pad: &PadRef) -> bool {
        self.pads.contains_key(pad)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PadRef, &PadRecord)> {
        self.pads.iter()
    }

    pub fn iter_direction(&self, direction: Direction) -> impl Iterator<Item = &PadRef> {
        self.pads
            .iter()
            .filter(move |(_, r)| r.direction == direction)
            .map(|(p, _)| p)
    }

    /// Generic per-pad scratch storage, for element-private bookkeeping that
    /// doesn't warrant a dedicated `PadRecord` field.
    pub fn get_data<T: 'static>(&self, pad: &PadRef, key: &str) -> Result<Option<&T>, UnknownPad> {
        let record = self.get(pad)?;
        Ok(record.custom.get(key).and_then(|v| v.downcast_ref::<T>()))
    }

    pub fn set_data<T: Send + 'static>(
        &mut self,
        pad: &PadRef,
        key: &str,
        value: T,
    ) -> Result<(), UnknownPad> {
        let record = self.get_mut(pad)?;
        record.custom.insert(key.to_string(), Box::new(value));
        Ok(())
    }

    pub fn update_data<T, F>(&mut self, pad: &PadRef, key: &str, f: F) -> Result<(), UnknownPad>
    where
        T: Send + Default + 'static,
        F: FnOnce(&mut T),
    {
        let record = self.get_mut(pad)?;
        let entry = record
            .custom
            .entry(key.to_string())
            .or_insert_with(|| Box::new(T::default()));
        if let Some(v) = entry.downcast_mut::<T>() {
            f(v);
        }
        Ok(())
    }
}
