//! BufferController (spec §4.4): rejects buffers on a pad that has no
//! caps set yet — the contract checked by the "buffer … caps … not sent"
//! feasibility test (spec §8, scenario 1) — and rejects buffers arriving
//! after `end_of_stream` was sent on the same pad (spec §3, §4.4).

use crate::action::Action;
use crate::buffer::Buffer;
use crate::callbacks::{Context, ElementCallbacks};
use crate::error::{ContractError, ElementError};
use crate::pad::PadRef;

pub fn handle(
    pad: &PadRef,
    buffers: Vec<Buffer>,
    callbacks: &mut dyn ElementCallbacks,
    ctx: &mut Context,
) -> Result<Vec<Action>, ElementError> {
    let record = ctx.pads.get(pad)?;
    if !record.caps_sent {
        return Err(ContractError::BufferBeforeCaps { pad: pad.clone() }.into());
    }
    if record.end_of_stream_sent {
        return Err(ContractError::BufferAfterEndOfStream { pad: pad.clone() }.into());
    }

    callbacks.handle_process(pad, buffers, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::pad::{Direction, Mode, PadInfo};
    use crate::pad_model::PadModel;

    struct Noop;
    impl ElementCallbacks for Noop {}

    #[test]
    fn buffer_before_caps_is_a_contract_error() {
        let mut pads = PadModel::new();
        let pad = PadRef::new("e", "sink");
        pads.register(pad.clone(), &PadInfo::new("sink", Direction::Input, Mode::Pull), 200);
        let config = RuntimeConfig::default();
        let mut ctx = Context {
            element_name: "e",
            pads: &mut pads,
            config: &config,
        };
        let mut cb = Noop;
        let result = handle(&pad, vec![Buffer::new(&b"x"[..])], &mut cb, &mut ctx);
        let err = result.unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ElementError::Contract(ContractError::BufferBeforeCaps { .. })));
        // The feasibility test greps for this exact pattern (spec §8).
        assert!(msg.to_lowercase().contains("buffer"));
        assert!(msg.to_lowercase().contains("caps"));
        assert!(msg.to_lowercase().contains("not sent"));
    }

    #[test]
    fn buffer_after_end_of_stream_is_a_contract_error() {
        let mut pads = PadModel::new();
        let pad = PadRef::new("e", "sink");
        pads.register(pad.clone(), &PadInfo::new("sink", Direction::Input, Mode::Pull), 200);
        pads.update(&pad, |r| {
            r.caps_sent = true;
            r.end_of_stream_sent = true;
        })
        .unwrap();
        let config = RuntimeConfig::default();
        let mut ctx = Context {
            element_name: "e",
            pads: &mut pads,
            config: &config,
        };
        let mut cb = Noop;
        let result = handle(&pad, vec![Buffer::new(&b"x"[..])], &mut cb, &mut ctx);
        let err = result.unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ElementError::Contract(ContractError::BufferAfterEndOfStream { .. })));
        assert!(msg.to_lowercase().contains("buffer"));
        assert!(msg.to_lowercase().contains("end of stream"));
    }
}
