//! Actions returned by element callbacks (spec §4.4 "Action interpretation").
//!
//! Actions are order-preserving: the list an element callback returns is
//! dispatched left to right, each to the controller matching its tag.

use crate::buffer::Buffer;
use crate::caps::Caps;
use crate::event::Event;
use crate::pad::PadRef;
use std::any::Any;
use std::sync::Arc;

/// How much demand to request, either as an absolute value or as a
/// function of the current demand (spec §4.3 "supply_demand").
#[derive(Clone)]
pub enum DemandAmount {
    Set(i64),
    Update(Arc<dyn Fn(i64) -> i64 + Send + Sync>),
}

/// Which pads `forward: :all` targets.
#[derive(Clone)]
pub enum ForwardTarget {
    All,
    Pads(Vec<PadRef>),
}

#[derive(Clone)]
pub enum Action {
    Buffer { pad: PadRef, buffers: Vec<Buffer> },
    Caps { pad: PadRef, caps: Caps },
    Event { pad: PadRef, event: Event },
    Demand { pad: PadRef, amount: DemandAmount },
    Redemand { pad: PadRef },
    Forward { target: ForwardTarget },
    Notify { payload: Arc<dyn Any + Send + Sync> },
    PlaybackChangeSuccessful,
}

impl Action {
    pub fn buffer(pad: PadRef, buffers: Vec<Buffer>) -> Self {
        Action::Buffer { pad, buffers }
    }

    pub fn caps(pad: PadRef, caps: Caps) -> Self {
        Action::Caps { pad, caps }
    }

    pub fn event(pad: PadRef, event: Event) -> Self {
        Action::Event { pad, event }
    }

    pub fn redemand(pad: PadRef) -> Self {
        Action::Redemand { pad }
    }

    pub fn forward_all() -> Self {
        Action::Forward {
            target: ForwardTarget::All,
        }
    }
}
