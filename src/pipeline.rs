//! Pipeline: the root parent (spec §4 "Pipeline", §6 "Parent API").
//!
//! A pipeline is a [`ParentCore`] with no owner of its own: nothing above
//! it to bubble state to, and a control mailbox it hands out to callers
//! instead of to a spawning parent.

use crate::bin::Bin;
use crate::callbacks::ElementCallbacks;
use crate::config::RuntimeConfig;
use crate::error::{ElementError, LinkError};
use crate::message::ToElement;
use crate::pad::PadRef;
use crate::parent::{child_life, dispatcher, link, ParentControl, ParentCore};
use crate::state_machine::PlaybackState;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A pipeline under construction. Build its subtree with [`add_element`],
/// [`add_bin`] and [`link`], then [`start`] it.
///
/// [`add_element`]: Pipeline::add_element
/// [`add_bin`]: Pipeline::add_bin
/// [`link`]: Pipeline::link
/// [`start`]: Pipeline::start
pub struct Pipeline {
    core: ParentCore,
    control_tx: flume::Sender<ToElement>,
    control_rx: flume::Receiver<ToElement>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, config: RuntimeConfig) -> Self {
        let (control_tx, control_rx) = flume::unbounded();
        Self {
            core: ParentCore::new(name, config, None),
            control_tx,
            control_rx,
        }
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn add_element(&mut self, name: impl Into<String>, callbacks: Box<dyn ElementCallbacks>) {
        child_life::spawn_element(&mut self.core, name, callbacks);
    }

    pub fn add_bin(&mut self, bin: Bin) {
        let name = bin.name().to_string();
        let mailbox = bin.mailbox();
        child_life::insert_child(&mut self.core, name, mailbox, Vec::new(), Vec::new(), HashMap::new(), bin.run());
    }

    pub fn link(&mut self, from: PadRef, to: PadRef) -> Result<(), LinkError> {
        link::establish_link(&mut self.core, from, to)
    }

    /// Captures a [`crate::testing::TestProbe`] onto this pipeline's
    /// stream-boundary bookkeeping. Must be called before [`start`](Self::start).
    pub fn probe(&self) -> crate::testing::TestProbe {
        self.core.probe()
    }

    /// Spawns the pipeline's message loop as a background task and returns
    /// a [`PipelineHandle`] for driving it.
    pub fn start(self) -> PipelineHandle {
        let control_tx = self.control_tx.clone();
        let task = tokio::spawn(dispatcher::run(self.core, self.control_rx));
        PipelineHandle { control_tx, task }
    }
}

/// The live handle to a started pipeline: playback control, out-of-band
/// messaging to a named child, and termination.
pub struct PipelineHandle {
    control_tx: flume::Sender<ToElement>,
    task: tokio::task::JoinHandle<Result<(), ElementError>>,
}

impl PipelineHandle {
    pub fn prepare(&self) {
        self.change_state(PlaybackState::Prepared);
    }

    pub fn play(&self) {
        self.change_state(PlaybackState::Playing);
    }

    pub fn stop(&self) {
        self.change_state(PlaybackState::Stopped);
    }

    fn change_state(&self, target: PlaybackState) {
        let _ = self.control_tx.send(ToElement::ChangePlaybackState(target));
    }

    /// Delivers an opaque payload to a named child's `handle_other`
    /// callback (spec §6 "Parent API").
    pub fn message_child(&self, child: impl Into<String>, payload: Arc<dyn Any + Send + Sync>) {
        let control = ParentControl::MessageChild {
            child: child.into(),
            payload,
        };
        let _ = self.control_tx.send(control.into_message());
    }

    /// Asks every element in the pipeline to shut down. If `blocking`, waits
    /// for the whole subtree to exit (or the termination grace period to
    /// elapse) before returning.
    pub async fn terminate(self, blocking: bool) -> Result<(), ElementError> {
        let (ack_tx, ack_rx) = tokio::sync::oneshot::channel();
        let control = ParentControl::Terminate {
            blocking,
            ack: Some(ack_tx),
        };
        let _ = self.control_tx.send(control.into_message());
        if !blocking {
            return Ok(());
        }
        let _ = ack_rx.await;
        match self.task.await {
            Ok(result) => result,
            Err(_) => Ok(()),
        }
    }

    /// Waits for the pipeline's message loop to exit on its own, without
    /// requesting termination — e.g. because its whole subtree crashed.
    pub async fn join(self) -> Result<(), ElementError> {
        match self.task.await {
            Ok(result) => result,
            Err(_) => Ok(()),
        }
    }
}
