//! DemandController (spec §4.4): invoked when a downstream peer asks an
//! output pull pad for more data.

use crate::action::Action;
use crate::callbacks::{Context, ElementCallbacks};
use crate::error::ElementError;
use crate::pad::PadRef;

pub fn handle(
    pad: &PadRef,
    size: u64,
    callbacks: &mut dyn ElementCallbacks,
    ctx: &mut Context,
) -> Result<Vec<Action>, ElementError> {
    let unit = ctx.pads.get(pad)?.demand_unit.clone();
    callbacks.handle_demand(pad, size, &unit, ctx)
}
