//! Bin: a parent that is also a child (spec §4 "Bin").
//!
//! A bin groups elements — and nested bins — as a single addressable unit
//! in a larger pipeline. To its own parent it looks like any other child:
//! one mailbox, one playback-state walk, one crash signal. Internally it
//! runs the same [`ParentCore`] engine a [`crate::pipeline::Pipeline`]
//! does.

use crate::callbacks::ElementCallbacks;
use crate::config::RuntimeConfig;
use crate::error::{ElementError, LinkError};
use crate::message::{ToElement, ToParent};
use crate::pad::PadRef;
use crate::parent::{child_life, dispatcher, link, ParentCore};
use std::collections::HashMap;

/// A bin under construction. Call [`Bin::add_element`] / [`Bin::add_bin`]
/// / [`Bin::link`] to build its subtree, then hand it to an owning parent
/// via [`Bin::mailbox`] and [`Bin::run`].
pub struct Bin {
    core: ParentCore,
    control_tx: flume::Sender<ToElement>,
    control_rx: flume::Receiver<ToElement>,
}

impl Bin {
    pub fn new(name: impl Into<String>, config: RuntimeConfig, own_parent: flume::Sender<ToParent>) -> Self {
        let (control_tx, control_rx) = flume::unbounded();
        Self {
            core: ParentCore::new(name, config, Some(own_parent)),
            control_tx,
            control_rx,
        }
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// The sender end of this bin's own mailbox, handed to whichever
    /// parent installs it as a child.
    pub fn mailbox(&self) -> flume::Sender<ToElement> {
        self.control_tx.clone()
    }

    pub fn add_element(&mut self, name: impl Into<String>, callbacks: Box<dyn ElementCallbacks>) {
        child_life::spawn_element(&mut self.core, name, callbacks);
    }

    /// Installs an already-constructed nested bin as a running child of
    /// this one. The nested bin's own pads are not exposed to this bin's
    /// parent (ghost pads are out of scope).
    pub fn add_bin(&mut self, bin: Bin) {
        let name = bin.name().to_string();
        let mailbox = bin.mailbox();
        child_life::insert_child(&mut self.core, name, mailbox, Vec::new(), Vec::new(), HashMap::new(), bin.run());
    }

    pub fn link(&mut self, from: PadRef, to: PadRef) -> Result<(), LinkError> {
        link::establish_link(&mut self.core, from, to)
    }

    /// Captures a [`crate::testing::TestProbe`] onto this bin's
    /// stream-boundary bookkeeping. Must be called before [`run`](Self::run).
    pub fn probe(&self) -> crate::testing::TestProbe {
        self.core.probe()
    }

    /// Consumes the bin and runs it to completion.
    pub async fn run(self) -> Result<(), ElementError> {
        dispatcher::run(self.core, self.control_rx).await
    }
}
