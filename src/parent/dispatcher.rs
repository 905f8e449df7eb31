//! Parent message loop (spec §4.9 "MessageDispatcher"): the single entry
//! point that demultiplexes incoming messages — from the parent's own
//! owner, from its children, and from child task exits — to the
//! controller that owns that concern.

use super::{child_life, lifecycle, link, timer, ParentControl, ParentCore};
use crate::error::{ChildExit, ElementError};
use crate::message::{ToElement, ToParent};
use std::any::Any;
use std::sync::Arc;

/// Drives `core` until its owner drops the control channel, the subtree
/// finishes an in-progress termination, or a child crash poisons it.
pub async fn run(mut core: ParentCore, control_rx: flume::Receiver<ToElement>) -> Result<(), ElementError> {
    core.timer_task = Some(timer::spawn(core.timer_tx.clone(), core.config.timer_period));

    loop {
        if core.terminate_deadline.is_some() && core.tasks.is_empty() {
            lifecycle::finish_termination(&mut core);
            return Ok(());
        }

        tokio::select! {
            msg = control_rx.recv_async() => {
                match msg {
                    Ok(msg) => dispatch_control(&mut core, msg),
                    Err(_) => return Ok(()),
                }
            }
            msg = core.children_rx.recv_async() => {
                if let Ok(msg) = msg {
                    dispatch_child_message(&mut core, msg);
                }
            }
            tick = core.timer_rx.recv_async() => {
                if tick.is_ok() {
                    for slot in core.children.values() {
                        let _ = slot.mailbox.send(ToElement::TimerTick);
                    }
                }
            }
            joined = core.tasks.join_next(), if !core.tasks.is_empty() => {
                match joined {
                    Some(Ok((name, result))) => {
                        let exit = match result {
                            Ok(()) => ChildExit::Normal,
                            Err(e) => ChildExit::Crash(e),
                        };
                        lifecycle::handle_child_down(&mut core, name, exit);
                    }
                    Some(Err(join_err)) => {
                        tracing::error!(parent = %core.name, error = %join_err, "child task panicked");
                    }
                    None => {}
                }
            }
            _ = wait_for_deadline(core.terminate_deadline) => {
                tracing::warn!(parent = %core.name, "termination grace period elapsed, force-killing remaining children");
                child_life::abort_all(&mut core);
                lifecycle::finish_termination(&mut core);
                return Ok(());
            }
        }

        if let Some(err) = core.crash_error.take() {
            return Err(err);
        }
    }
}

async fn wait_for_deadline(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

fn dispatch_control(core: &mut ParentCore, msg: ToElement) {
    match msg {
        ToElement::ChangePlaybackState(target) => lifecycle::handle_change_playback_state(core, target),
        ToElement::Shutdown => lifecycle::begin_termination(core, None),
        ToElement::TimerTick => {
            for slot in core.children.values() {
                let _ = slot.mailbox.send(ToElement::TimerTick);
            }
        }
        ToElement::Other(payload) => dispatch_other(core, payload),
        ToElement::HandleLink { .. }
        | ToElement::Caps { .. }
        | ToElement::Event { .. }
        | ToElement::Buffers { .. }
        | ToElement::Demand { .. }
        | ToElement::Redemand { .. } => {
            tracing::warn!(parent = %core.name, "bin-level ghost pads are not supported, dropping message");
        }
    }
}

fn dispatch_other(core: &mut ParentCore, payload: Arc<dyn Any + Send + Sync>) {
    match payload.downcast::<ParentControl>() {
        Ok(control_arc) => match Arc::try_unwrap(control_arc) {
            Ok(ParentControl::MessageChild { child, payload }) => {
                match core.children.get(&child) {
                    Some(slot) => {
                        let _ = slot.mailbox.send(ToElement::Other(payload));
                    }
                    None => tracing::warn!(parent = %core.name, %child, "message_child targets unknown child"),
                }
            }
            Ok(ParentControl::Terminate { blocking: _, ack }) => {
                lifecycle::begin_termination(core, ack);
            }
            Err(_) => tracing::warn!(parent = %core.name, "parent control had more than one owner, dropping"),
        },
        Err(payload) => core.bubble(ToParent::Other(payload)),
    }
}

fn dispatch_child_message(core: &mut ParentCore, msg: ToParent) {
    match msg {
        ToParent::PlaybackStateChanged { child, state } => {
            lifecycle::handle_child_playback_state_changed(core, child, state)
        }
        ToParent::ChangePlaybackState(_) => {
            tracing::trace!(parent = %core.name, "ignoring child-originated change_playback_state");
        }
        ToParent::Notification { child, payload } => lifecycle::handle_notification(core, child, payload),
        ToParent::StartOfStream { child, pad } => lifecycle::handle_start_of_stream(core, child, pad),
        ToParent::EndOfStream { child, pad } => lifecycle::handle_end_of_stream(core, child, pad),
        ToParent::LinkResponse { link_id } => link::handle_link_response(core, link_id),
        ToParent::ClockRatioUpdate(_) => {
            tracing::trace!(parent = %core.name, "clock ratio propagation is not implemented");
        }
        ToParent::ChildDown { child, exit } => lifecycle::handle_child_down(core, child, exit),
        ToParent::CrossBinLink { link_id, to_respond } => link::handle_cross_bin_link(core, link_id, to_respond),
        ToParent::TimerTick => {}
        ToParent::Other(payload) => core.bubble(ToParent::Other(payload)),
    }
}
