//! Pad linking protocol (spec §4.6 "LinkHandler").
//!
//! A link is established with a two-step handshake: the parent sends
//! `HandleLink` to both endpoints, each element registers the peer and
//! replies with `LinkResponse`; once both replies are in, the parent
//! advances the newly linked children to its current target state.

use super::{lifecycle, PendingLink, ParentCore};
use crate::error::LinkError;
use crate::message::ToElement;
use crate::pad::{Mode, PadRef};
use crate::pad_model::PeerRef;

/// Links `from` (an output pad) to `to` (an input pad) on two children of
/// `core`. Both pad names must belong to children already spawned on
/// `core` — cross-bin links (where one endpoint lives outside this
/// parent's subtree) are not resolved here; see
/// [`handle_cross_bin_link`].
pub fn establish_link(core: &mut ParentCore, from: PadRef, to: PadRef) -> Result<(), LinkError> {
    let link_id = core.next_link_id;
    core.next_link_id += 1;

    let from_slot = core
        .children
        .get(&from.element)
        .ok_or_else(|| LinkError::UnknownPad(from.clone()))?;
    let to_slot = core
        .children
        .get(&to.element)
        .ok_or_else(|| LinkError::UnknownPad(to.clone()))?;

    let from_is_push = from_slot
        .output_pads
        .iter()
        .any(|p| p.name.as_ref() == from.name.as_ref() && p.mode == Mode::Push);
    let consumer_toilet = to_slot.toilets.get(to.name.as_ref()).cloned();

    let from_peer = PeerRef {
        pad: to.clone(),
        mailbox: to_slot.mailbox.clone(),
        toilet: if from_is_push { consumer_toilet } else { None },
    };
    let to_peer = PeerRef {
        pad: from.clone(),
        mailbox: from_slot.mailbox.clone(),
        toilet: None,
    };

    let from_mailbox = from_slot.mailbox.clone();
    let to_mailbox = to_slot.mailbox.clone();

    if from_mailbox
        .send(ToElement::HandleLink {
            link_id,
            this_pad: from.clone(),
            peer: from_peer,
        })
        .is_err()
    {
        return Err(LinkError::UnknownPad(from));
    }
    if to_mailbox
        .send(ToElement::HandleLink {
            link_id,
            this_pad: to.clone(),
            peer: to_peer,
        })
        .is_err()
    {
        return Err(LinkError::UnknownPad(to));
    }

    core.pending_links.insert(link_id, PendingLink { to_respond: 2 });
    Ok(())
}

/// A child replied to its half of the handshake. Once both halves of a
/// link have responded, the newly linked children are walked to the
/// parent's current target playback state.
pub(crate) fn handle_link_response(core: &mut ParentCore, link_id: u64) {
    let Some(pending) = core.pending_links.get_mut(&link_id) else {
        tracing::warn!(parent = %core.name, link_id, "link_response for unknown link");
        return;
    };
    pending.to_respond = pending.to_respond.saturating_sub(1);
    if pending.to_respond == 0 {
        core.pending_links.remove(&link_id);
        lifecycle::broadcast_playback_state(core, core.target_state);
    }
}

/// A child (a bin) could not resolve a link locally and is bubbling it up
/// the parent chain (spec §4.9 "Cross-bin linking recursion"). This level
/// has no record of the link — it just forwards the bubble further up;
/// the level that owns the endpoint will eventually answer with a direct
/// `handle_link` instead.
pub(crate) fn handle_cross_bin_link(core: &mut ParentCore, link_id: u64, to_respond: u32) {
    core.bubble(crate::message::ToParent::CrossBinLink { link_id, to_respond });
}
