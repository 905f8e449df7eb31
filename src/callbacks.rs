//! The element callback contract (spec §6 "Element callback contract").
//!
//! Concrete element bodies (decoders, sources, sinks, filters) are out of
//! scope for this crate; only the trait they must implement lives here.
//! Dynamic dispatch on "element module" (spec §9 design note) is realized
//! as a plain trait object, `Box<dyn ElementCallbacks>`, captured once at
//! spawn time — no process-dictionary-style module lookup is needed.

use crate::action::Action;
use crate::caps::Caps;
use crate::buffer::Buffer;
use crate::config::RuntimeConfig;
use crate::error::ElementError;
use crate::event::Event;
use crate::pad::{DemandUnit, PadInfo, PadRef};
use crate::pad_model::PadModel;
use std::any::Any;
use std::sync::Arc;

/// Everything a callback is handed besides its own private state: the pad
/// store and the tunables it was spawned with.
pub struct Context<'a> {
    pub element_name: &'a str,
    pub pads: &'a mut PadModel,
    pub config: &'a RuntimeConfig,
}

pub type CallbackResult = Result<Vec<Action>, ElementError>;

/// The capability set every element module implements a subset of.
/// `handle_init` has no method here: in Rust the element's own
/// constructor plays that role (spec §6's `{ok, state} | {error, reason}`
/// maps onto `Result<Box<dyn ElementCallbacks>, String>` returned by
/// whatever factory function builds the element before it is spawned).
pub trait ElementCallbacks: Send {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        Vec::new()
    }

    fn known_output_pads(&self) -> Vec<PadInfo> {
        Vec::new()
    }

    fn handle_stopped_to_prepared(&mut self, _ctx: &mut Context) -> CallbackResult {
        Ok(Vec::new())
    }

    fn handle_prepared_to_playing(&mut self, _ctx: &mut Context) -> CallbackResult {
        Ok(Vec::new())
    }

    fn handle_playing_to_prepared(&mut self, _ctx: &mut Context) -> CallbackResult {
        Ok(Vec::new())
    }

    fn handle_prepared_to_stopped(&mut self, _ctx: &mut Context) -> CallbackResult {
        Ok(Vec::new())
    }

    /// Output pull pads only.
    fn handle_demand(
        &mut self,
        _pad: &PadRef,
        _size: u64,
        _unit: &DemandUnit,
        _ctx: &mut Context,
    ) -> CallbackResult {
        Ok(Vec::new())
    }

    /// Input pads. Default for filters is `forward: :all`.
    fn handle_caps(&mut self, _pad: &PadRef, _caps: &Caps, _ctx: &mut Context) -> CallbackResult {
        Ok(vec![Action::forward_all()])
    }

    /// Input pads with buffer semantics.
    fn handle_process(
        &mut self,
        pad: &PadRef,
        _buffers: Vec<Buffer>,
        _ctx: &mut Context,
    ) -> CallbackResult {
        let _ = pad;
        Ok(Vec::new())
    }

    fn handle_event(&mut self, _pad: &PadRef, _event: &Event, _ctx: &mut Context) -> CallbackResult {
        Ok(vec![Action::forward_all()])
    }

    fn handle_other(
        &mut self,
        _message: Arc<dyn Any + Send + Sync>,
        _ctx: &mut Context,
    ) -> CallbackResult {
        Ok(Vec::new())
    }

    fn handle_shutdown(&mut self, _reason: &str) {}
}
