//! CapsController (spec §4.4): validates new caps against the pad's
//! declared constraint, updates stored caps, and invokes `handle_caps`.

use super::ForwardPayload;
use crate::action::Action;
use crate::callbacks::{Context, ElementCallbacks};
use crate::caps::Caps;
use crate::error::{ContractError, ElementError};
use crate::pad::PadRef;

pub fn handle(
    pad: &PadRef,
    caps: Caps,
    callbacks: &mut dyn ElementCallbacks,
    ctx: &mut Context,
) -> Result<(Vec<Action>, ForwardPayload), ElementError> {
    let accepts = ctx.pads.get(pad)?.caps_constraint.accepts(&caps);
    if !accepts {
        return Err(ContractError::CapsMismatch {
            pad: pad.clone(),
            caps: caps.clone(),
        }
        .into());
    }

    ctx.pads.update(pad, |record| {
        record.negotiated_caps = Some(caps.clone());
        record.caps_sent = true;
    })?;

    let actions = callbacks.handle_caps(pad, &caps, ctx)?;
    Ok((actions, ForwardPayload::Caps(caps)))
}
