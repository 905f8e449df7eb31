//! EventController (spec §4.4): routes by event kind, tracking the
//! start/end-of-stream flags and informing the parent of both.

use super::ForwardPayload;
use crate::action::Action;
use crate::callbacks::{Context, ElementCallbacks};
use crate::error::{ContractError, ElementError};
use crate::event::Event;
use crate::pad::PadRef;

/// Side effects the element actor must carry out after this controller
/// returns: telling the parent about stream boundaries is not this
/// controller's job (it has no mailbox handle), so it reports back what
/// happened instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamNotice {
    None,
    StartOfStream,
    EndOfStream,
}

pub fn handle(
    pad: &PadRef,
    event: Event,
    callbacks: &mut dyn ElementCallbacks,
    ctx: &mut Context,
) -> Result<(Vec<Action>, ForwardPayload, StreamNotice), ElementError> {
    let notice = match &event {
        Event::StartOfStream => {
            let already = ctx.pads.get(pad)?.start_of_stream_sent;
            if already {
                return Err(ContractError::DuplicateStreamEvent {
                    pad: pad.clone(),
                    kind: "start_of_stream",
                }
                .into());
            }
            ctx.pads.update(pad, |r| r.start_of_stream_sent = true)?;
            StreamNotice::StartOfStream
        }
        Event::EndOfStream => {
            let already = ctx.pads.get(pad)?.end_of_stream_sent;
            if already {
                return Err(ContractError::DuplicateStreamEvent {
                    pad: pad.clone(),
                    kind: "end_of_stream",
                }
                .into());
            }
            ctx.pads.update(pad, |r| r.end_of_stream_sent = true)?;
            StreamNotice::EndOfStream
        }
        Event::Custom { .. } => StreamNotice::None,
    };

    let actions = callbacks.handle_event(pad, &event, ctx)?;
    Ok((actions, ForwardPayload::Event(event), notice))
}
