//! Parent-level playback transitions and stream-boundary bookkeeping
//! (spec §4.8 "LifecycleController").

use super::{child_life, ParentCore};
use crate::error::ChildExit;
use crate::message::{ToElement, ToParent};
use crate::pad::PadRef;
use crate::state_machine::PlaybackState;
use std::any::Any;
use std::sync::Arc;

/// Requests a new target playback state for the whole subtree. Each child
/// walks to it on its own schedule and reports back; the parent only
/// advances its own state once every child has arrived (spec §8 "A parent
/// reports playback_state_changed(new) only after all children have
/// reported new").
pub(crate) fn handle_change_playback_state(core: &mut ParentCore, target: PlaybackState) {
    core.target_state = target;
    broadcast_playback_state(core, target);
}

pub(crate) fn broadcast_playback_state(core: &mut ParentCore, target: PlaybackState) {
    for slot in core.children.values() {
        let _ = slot.mailbox.send(ToElement::ChangePlaybackState(target));
    }
}

/// A child reported reaching `state`. Once every child matches the
/// parent's current target, the parent itself is considered to have
/// arrived and bubbles the same notice upward.
pub(crate) fn handle_child_playback_state_changed(core: &mut ParentCore, child: String, state: PlaybackState) {
    if let Some(slot) = core.children.get_mut(&child) {
        slot.state = state;
    }
    let all_arrived = !core.children.is_empty()
        && core.children.values().all(|slot| slot.state == core.target_state);
    if all_arrived && core.state != core.target_state {
        core.state = core.target_state;
        tracing::debug!(parent = %core.name, state = %core.state, "all children reached target state");
        core.bubble(ToParent::PlaybackStateChanged {
            child: core.name.clone(),
            state: core.state,
        });
    }
}

pub(crate) fn handle_start_of_stream(core: &mut ParentCore, child: String, pad: PadRef) {
    core.observed_sos.lock().insert((child.clone(), pad.to_string()));
    core.bubble(ToParent::StartOfStream { child, pad });
}

pub(crate) fn handle_end_of_stream(core: &mut ParentCore, child: String, pad: PadRef) {
    core.observed_eos.lock().insert((child.clone(), pad.to_string()));
    core.bubble(ToParent::EndOfStream { child, pad });
}

pub(crate) fn handle_notification(core: &ParentCore, child: String, payload: Arc<dyn Any + Send + Sync>) {
    core.bubble(ToParent::Notification { child, payload });
}

/// A monitored child task exited. A crash takes down the whole subtree
/// (spec §4.7 "Crash ... causing parent termination"); a normal or killed
/// exit is just bookkeeping. `core.crashed` guards against reporting the
/// same subtree crash to the grandparent twice, once per sibling that was
/// aborted as a result.
pub(crate) fn handle_child_down(core: &mut ParentCore, child: String, exit: ChildExit) {
    core.children.remove(&child);
    match exit {
        ChildExit::Crash(err) => {
            if core.crashed {
                return;
            }
            core.crashed = true;
            tracing::error!(parent = %core.name, %child, error = %err, "child crashed, tearing down subtree");
            child_life::abort_all(core);
            core.crash_error = Some(err.clone());
            core.bubble(ToParent::ChildDown {
                child: core.name.clone(),
                exit: ChildExit::Crash(err),
            });
        }
        exit @ (ChildExit::Normal | ChildExit::Killed) => {
            tracing::debug!(parent = %core.name, %child, exit = %exit, "child exited");
        }
    }
}

/// Begins tearing down the whole subtree: every child is asked to shut
/// down, and a grace-period deadline is armed. `dispatcher::run` force-
/// aborts whatever is left once the deadline passes (spec §5
/// "Cancellation / timeouts").
pub(crate) fn begin_termination(core: &mut ParentCore, ack: Option<tokio::sync::oneshot::Sender<()>>) {
    for slot in core.children.values() {
        let _ = slot.mailbox.send(ToElement::Shutdown);
    }
    core.terminate_deadline = Some(tokio::time::Instant::now() + core.config.termination_grace);
    core.terminate_ack = ack;
}

/// Called once every child has exited (or the grace period elapsed and
/// the rest were force-aborted). Fires the caller's `ack`, if any.
pub(crate) fn finish_termination(core: &mut ParentCore) {
    child_life::abort_all(core);
    if let Some(task) = core.timer_task.take() {
        task.abort();
    }
    if let Some(ack) = core.terminate_ack.take() {
        let _ = ack.send(());
    }
}
