//! Stream controllers (spec §4.4): each dispatches one kind of incoming
//! item to the matching element callback and hands the returned actions
//! back to the caller for interpretation.
//!
//! The controllers themselves only validate ordering and update pad state;
//! they never touch peer mailboxes. Actually carrying out the returned
//! actions — sending buffers downstream, adjusting demand, forwarding — is
//! the element actor's job (`element::actor::run_actions`), since that is
//! the part that needs the peer's mailbox handle.

pub mod buffer;
pub mod caps;
pub mod demand;
pub mod event;

use crate::caps::Caps;
use crate::event::Event;

/// What a `Forward { target: All }` action should re-emit, set by the
/// controller before invoking the callback that might return it.
#[derive(Clone)]
pub enum ForwardPayload {
    Caps(Caps),
    Event(Event),
}
