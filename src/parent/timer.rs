//! Periodic timer ticks fanned out to a subtree (spec §4.9 "TimerController").
//!
//! Some elements need a wall-clock heartbeat independent of buffer flow
//! (clock-ratio smoothing, stall detection). The parent owns the ticker and
//! broadcasts it down rather than each element running its own timer.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawns a background task that pushes a unit tick into `tick_tx` every
/// `period`, until the receiving end is dropped. `dispatcher::run` selects
/// on the matching receiver and fans each tick out to every child as
/// `ToElement::TimerTick`.
pub fn spawn(tick_tx: flume::Sender<()>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tick_tx.send(()).is_err() {
                return;
            }
        }
    })
}
