//! Tagged-union message envelopes exchanged between actors (spec §4.9,
//! §6 "Parent API").
//!
//! Every inter-actor interaction in the runtime is one of these messages
//! traveling over a `flume` mailbox; there is no other channel of
//! communication between actors (spec §5).

use crate::buffer::Buffer;
use crate::caps::Caps;
use crate::event::Event;
use crate::pad::PadRef;
use crate::pad_model::PeerRef;
use crate::state_machine::PlaybackState;
use std::any::Any;
use std::sync::Arc;

/// Messages an element's own mailbox can receive.
pub enum ToElement {
    Caps { pad: PadRef, caps: Caps },
    Event { pad: PadRef, event: Event },
    Buffers { pad: PadRef, buffers: Vec<Buffer> },
    /// A peer on an output pad is requesting `size` more units.
    Demand { pad: PadRef, size: u64 },
    Redemand { pad: PadRef },
    ChangePlaybackState(PlaybackState),
    /// Parent-driven link handshake (spec §4.6).
    HandleLink {
        link_id: u64,
        this_pad: PadRef,
        peer: PeerRef,
    },
    Shutdown,
    TimerTick,
    Other(Arc<dyn Any + Send + Sync>),
}

/// Messages a parent (`Pipeline`/`Bin`) mailbox can receive, either from a
/// child bubbling state up, or from its own owner (spec §4.8, §4.9).
pub enum ToParent {
    PlaybackStateChanged { child: String, state: PlaybackState },
    ChangePlaybackState(PlaybackState),
    Notification { child: String, payload: Arc<dyn Any + Send + Sync> },
    StartOfStream { child: String, pad: PadRef },
    EndOfStream { child: String, pad: PadRef },
    LinkResponse { link_id: u64 },
    ClockRatioUpdate(f64),
    ChildDown { child: String, exit: crate::error::ChildExit },
    /// Child bubbling a `forward: :all` action it can't resolve locally
    /// across a bin boundary (cross-bin linking, spec §4.6, §9).
    CrossBinLink { link_id: u64, to_respond: u32 },
    TimerTick,
    Other(Arc<dyn Any + Send + Sync>),
}
