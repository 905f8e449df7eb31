//! Child spawn and crash bookkeeping (spec §4.7 "ChildLifeController").

use super::{ChildSlot, ParentCore};
use crate::callbacks::ElementCallbacks;
use crate::error::ElementError;
use crate::message::ToElement;
use crate::pad::PadInfo;
use crate::state_machine::PlaybackState;
use crate::toilet::Toilet;
use std::collections::HashMap;
use std::sync::Arc;

/// Registers an already-spawned child's handle and drives its actor future
/// to completion inside the parent's `JoinSet`, tagging the result with
/// its name so `dispatcher::run` can tell children apart on exit.
#[allow(clippy::too_many_arguments)]
pub(crate) fn insert_child<F>(
    core: &mut ParentCore,
    name: String,
    mailbox: flume::Sender<ToElement>,
    input_pads: Vec<PadInfo>,
    output_pads: Vec<PadInfo>,
    toilets: HashMap<String, Arc<Toilet>>,
    future: F,
) where
    F: std::future::Future<Output = Result<(), ElementError>> + Send + 'static,
{
    let tagged_name = name.clone();
    let abort = core.tasks.spawn(async move { (tagged_name, future.await) });
    core.children.insert(
        name,
        ChildSlot {
            mailbox,
            input_pads,
            output_pads,
            toilets,
            state: PlaybackState::Stopped,
            abort,
        },
    );
}

/// Spawns a leaf element as a child of `core` (spec §4.7 "Spawn").
pub fn spawn_element(core: &mut ParentCore, name: impl Into<String>, callbacks: Box<dyn ElementCallbacks>) {
    let name = name.into();
    let (handle, actor) = crate::element::spawn_parts(
        name.clone(),
        callbacks,
        core.config.clone(),
        core.children_tx.clone(),
    );
    insert_child(
        core,
        name,
        handle.mailbox,
        handle.input_pads,
        handle.output_pads,
        handle.toilets,
        actor.run(),
    );
}

/// Aborts every running child task without waiting for acknowledgement;
/// used when a sibling crash forces immediate teardown of the subtree
/// (spec §4.7 "Crash ... causing parent termination").
pub(crate) fn abort_all(core: &mut ParentCore) {
    for slot in core.children.values() {
        slot.abort.abort();
    }
}
