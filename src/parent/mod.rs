//! The parent engine shared by [`crate::pipeline::Pipeline`] (root) and
//! [`crate::bin::Bin`] (inner parent): child supervision, the link
//! handshake, and playback-state fan-out (spec §4.7 "ChildLifeController",
//! §4.8 "LifecycleController", §4.9 "MessageDispatcher").
//!
//! A `Bin` looks like an element to its own parent and like a parent to
//! its children; both roles are driven by the same [`ParentCore`], the way
//! the teacher crate's ring buffer is shared verbatim between its SPSC
//! sender and receiver halves.

pub mod child_life;
pub mod dispatcher;
pub mod lifecycle;
pub mod link;
pub mod timer;

use crate::config::RuntimeConfig;
use crate::error::ElementError;
use crate::message::{ToElement, ToParent};
use crate::pad::PadInfo;
use crate::state_machine::PlaybackState;
use crate::toilet::Toilet;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinSet};

/// Parent-only control signals smuggled through `ToElement::Other`, so the
/// shared message enum doesn't need parent-specific variants a leaf
/// element would never see (spec §6 "Parent API").
pub enum ParentControl {
    MessageChild {
        child: String,
        payload: Arc<dyn Any + Send + Sync>,
    },
    Terminate {
        blocking: bool,
        ack: Option<tokio::sync::oneshot::Sender<()>>,
    },
}

impl ParentControl {
    pub fn into_message(self) -> ToElement {
        ToElement::Other(Arc::new(self))
    }
}

/// What a parent keeps for each spawned child, whether a leaf element or a
/// nested bin.
pub(crate) struct ChildSlot {
    pub mailbox: flume::Sender<ToElement>,
    pub input_pads: Vec<PadInfo>,
    pub output_pads: Vec<PadInfo>,
    pub toilets: HashMap<String, Arc<Toilet>>,
    pub state: PlaybackState,
    pub abort: AbortHandle,
}

/// Bookkeeping for one in-flight two-step link handshake (spec §4.6).
pub(crate) struct PendingLink {
    pub to_respond: u32,
}

/// The shared engine. Owns child supervision, the pending link table, and
/// the parent's own playback-state walk.
pub struct ParentCore {
    pub(crate) name: String,
    pub(crate) config: RuntimeConfig,
    /// `None` for the pipeline root; `Some` for a bin, to bubble
    /// `ToParent` messages further up the tree.
    pub(crate) own_parent: Option<flume::Sender<ToParent>>,
    pub(crate) children: HashMap<String, ChildSlot>,
    pub(crate) children_tx: flume::Sender<ToParent>,
    pub(crate) children_rx: flume::Receiver<ToParent>,
    pub(crate) pending_links: HashMap<u64, PendingLink>,
    pub(crate) next_link_id: u64,
    pub(crate) state: PlaybackState,
    pub(crate) target_state: PlaybackState,
    pub(crate) crashed: bool,
    /// Set alongside `crashed`, so `dispatcher::run` can surface the
    /// triggering error to whatever awaits this subtree's task, even when
    /// there is no `own_parent` to bubble it to (the pipeline root case).
    pub(crate) crash_error: Option<ElementError>,
    pub(crate) tasks: JoinSet<(String, Result<(), ElementError>)>,
    pub(crate) terminate_deadline: Option<tokio::time::Instant>,
    pub(crate) terminate_ack: Option<tokio::sync::oneshot::Sender<()>>,
    /// Testing surface bookkeeping for `assert_start_of_stream` /
    /// `assert_end_of_stream` (spec §6 "Assertions"). Shared with any
    /// `crate::testing::TestProbe` taken before the core was moved into
    /// its message loop.
    pub(crate) observed_sos: Arc<Mutex<HashSet<(String, String)>>>,
    pub(crate) observed_eos: Arc<Mutex<HashSet<(String, String)>>>,
    /// Ticked by a background task spawned the first time `dispatcher::run`
    /// polls this core; fanned out to every child as `TimerTick`.
    pub(crate) timer_tx: flume::Sender<()>,
    pub(crate) timer_rx: flume::Receiver<()>,
    pub(crate) timer_task: Option<tokio::task::JoinHandle<()>>,
}

impl ParentCore {
    pub fn new(name: impl Into<String>, config: RuntimeConfig, own_parent: Option<flume::Sender<ToParent>>) -> Self {
        let (children_tx, children_rx) = flume::unbounded();
        let (timer_tx, timer_rx) = flume::unbounded();
        Self {
            name: name.into(),
            config,
            own_parent,
            children: HashMap::new(),
            children_tx,
            children_rx,
            pending_links: HashMap::new(),
            next_link_id: 0,
            state: PlaybackState::Stopped,
            target_state: PlaybackState::Stopped,
            crashed: false,
            crash_error: None,
            tasks: JoinSet::new(),
            terminate_deadline: None,
            terminate_ack: None,
            observed_sos: Arc::new(Mutex::new(HashSet::new())),
            observed_eos: Arc::new(Mutex::new(HashSet::new())),
            timer_tx,
            timer_rx,
            timer_task: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn bubble(&self, msg: ToParent) {
        if let Some(parent) = &self.own_parent {
            let _ = parent.send(msg);
        }
    }

    pub fn has_seen_start_of_stream(&self, child: &str, pad: &str) -> bool {
        self.observed_sos.lock().iter().any(|(c, p)| c == child && p.contains(pad))
    }

    pub fn has_seen_end_of_stream(&self, child: &str, pad: &str) -> bool {
        self.observed_eos.lock().iter().any(|(c, p)| c == child && p.contains(pad))
    }

    /// Captures a cheap, clonable handle onto this core's stream-boundary
    /// bookkeeping, usable after the core itself has been moved into its
    /// message loop (see `crate::testing::TestProbe`).
    pub fn probe(&self) -> crate::testing::TestProbe {
        crate::testing::TestProbe::new(self.observed_sos.clone(), self.observed_eos.clone())
    }
}
