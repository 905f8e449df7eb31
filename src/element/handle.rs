//! External handle a parent holds for a spawned child (spec §6 "Parent
//! API", §4.7 "Spawn: start a child actor ... monitor it").

use super::actor::ElementActor;
use crate::callbacks::ElementCallbacks;
use crate::config::RuntimeConfig;
use crate::message::{ToElement, ToParent};
use crate::pad::PadInfo;
use crate::toilet::Toilet;
use std::collections::HashMap;
use std::sync::Arc;

/// What a parent needs to talk to and link a child, without caring whether
/// the child is a leaf element or a nested bin — both present this same
/// surface (spec §2 "Bin: a parent that is itself a child").
pub struct ElementHandle {
    pub name: String,
    pub mailbox: flume::Sender<ToElement>,
    pub input_pads: Vec<PadInfo>,
    pub output_pads: Vec<PadInfo>,
    /// Toilet handles of this element's statically declared push-mode
    /// input pads, keyed by pad name, so the parent can wire a linked
    /// producer's output pad to the consumer's toilet without a mailbox
    /// round trip (spec §4.3 "outgoing buffers accounting").
    pub toilets: HashMap<String, Arc<Toilet>>,
}

/// Builds the actor task and the handle a parent keeps for it. The caller
/// is responsible for driving `actor.run()` to completion, typically by
/// spawning it into a `tokio::task::JoinSet` (`parent::child_life::spawn`).
pub fn spawn_parts(
    name: impl Into<String>,
    callbacks: Box<dyn ElementCallbacks>,
    config: RuntimeConfig,
    parent_mailbox: flume::Sender<ToParent>,
) -> (ElementHandle, ElementActor) {
    let name = name.into();
    let (actor, mailbox, input_pads, output_pads, toilets) =
        ElementActor::new(name.clone(), callbacks, config, parent_mailbox);
    (
        ElementHandle {
            name,
            mailbox,
            input_pads,
            output_pads,
            toilets,
        },
        actor,
    )
}
