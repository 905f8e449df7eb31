//! The element actor's mailbox loop: interprets `ToElement` messages,
//! drives the demand protocol, and dispatches the actions callbacks
//! return (spec §4.3 "DemandHandler", §4.4 "Action interpretation",
//! §4.5 "ElementStateMachine").
//!
//! Every method here runs to completion without awaiting — the only
//! suspension point is the mailbox receive in [`ElementActor::run`] (spec
//! §5 "Suspension points").

use crate::action::{Action, DemandAmount, ForwardTarget};
use crate::buffer::Buffer;
use crate::callbacks::{Context, ElementCallbacks};
use crate::caps::Caps;
use crate::config::RuntimeConfig;
use crate::controller::{self, ForwardPayload};
use crate::demand::{DelayedAction, DemandHandler};
use crate::error::{ContractError, ElementError, LinkError, ToiletOverflowError};
use crate::event::Event;
use crate::input_buffer::QueueItem;
use crate::message::{ToElement, ToParent};
use crate::pad::{Availability, Mode, PadInfo, PadRef};
use crate::pad_model::{PadModel, PeerRef};
use crate::state_machine::{ElementStateMachine, PlaybackState, TransitionCallback};
use std::any::Any;
use std::sync::Arc;

/// Marker payload for `ToElement::TimerTick`, routed to `handle_other`
/// since the callback contract has no dedicated timer hook (spec §4.9:
/// `TimerController` is parent-scoped).
struct TimerTickMarker;

pub struct ElementActor {
    name: String,
    callbacks: Box<dyn ElementCallbacks>,
    pads: PadModel,
    state_machine: ElementStateMachine,
    demand: DemandHandler,
    config: RuntimeConfig,
    parent_mailbox: flume::Sender<ToParent>,
    mailbox_rx: flume::Receiver<ToElement>,
    /// Declarations for `on_request` pads, registered lazily the first time
    /// a link names them (spec §6 "availability ∈ {always, on_request}").
    pad_templates: Vec<PadInfo>,
}

impl ElementActor {
    /// Builds the actor plus everything its parent needs to reach it:
    /// the mailbox sender and its statically declared pad lists.
    pub fn new(
        name: String,
        mut callbacks: Box<dyn ElementCallbacks>,
        config: RuntimeConfig,
        parent_mailbox: flume::Sender<ToParent>,
    ) -> (
        Self,
        flume::Sender<ToElement>,
        Vec<PadInfo>,
        Vec<PadInfo>,
        std::collections::HashMap<String, Arc<crate::toilet::Toilet>>,
    ) {
        let (tx, rx) = flume::unbounded();
        let input_infos = callbacks.known_input_pads();
        let output_infos = callbacks.known_output_pads();

        let mut pads = PadModel::new();
        let mut templates = Vec::new();
        let mut toilets = std::collections::HashMap::new();
        for info in input_infos.iter().chain(output_infos.iter()) {
            if info.availability == Availability::Always {
                let pad_ref = PadRef::new(name.clone(), info.name.clone());
                pads.register(pad_ref.clone(), info, config.toilet_overflow_threshold);
                if let Ok(record) = pads.get(&pad_ref) {
                    if let Some(toilet) = record.toilet.clone() {
                        toilets.insert(info.name.to_string(), toilet);
                    }
                }
            } else {
                templates.push(info.clone());
            }
        }

        let actor = Self {
            name,
            callbacks,
            pads,
            state_machine: ElementStateMachine::new(),
            demand: DemandHandler::new(),
            config,
            parent_mailbox,
            mailbox_rx: rx,
            pad_templates: templates,
        };
        (actor, tx, input_infos, output_infos, toilets)
    }

    pub async fn run(mut self) -> Result<(), ElementError> {
        loop {
            let msg = match self.mailbox_rx.recv_async().await {
                Ok(msg) => msg,
                Err(_) => return Ok(()), // every sender dropped, nothing left to do
            };
            if matches!(msg, ToElement::Shutdown) {
                self.callbacks.handle_shutdown("terminate");
                return Ok(());
            }
            if let Err(err) = self.dispatch(msg) {
                tracing::error!(element = %self.name, error = %err, "element crashed");
                self.callbacks.handle_shutdown(&err.to_string());
                return Err(err);
            }
        }
    }

    fn dispatch(&mut self, msg: ToElement) -> Result<(), ElementError> {
        match msg {
            ToElement::Caps { pad, caps } => self.on_incoming_caps(pad, caps),
            ToElement::Event { pad, event } => self.on_incoming_event(pad, event),
            ToElement::Buffers { pad, buffers } => self.on_incoming_buffers(pad, buffers),
            ToElement::Demand { pad, size } => self.invoke_demand_controller(&pad, size),
            ToElement::Redemand { pad } => self.handle_redemand(&pad),
            ToElement::ChangePlaybackState(target) => self.handle_change_playback_state(target),
            ToElement::HandleLink { link_id, this_pad, peer } => {
                self.handle_link(link_id, this_pad, peer)
            }
            ToElement::TimerTick => self.on_other(Arc::new(TimerTickMarker)),
            ToElement::Other(payload) => self.on_other(payload),
            ToElement::Shutdown => unreachable!("handled in run()"),
        }
    }

    // ---- incoming stream items -------------------------------------

    fn on_incoming_caps(&mut self, pad: PadRef, caps: Caps) -> Result<(), ElementError> {
        let mut ctx = Context {
            element_name: &self.name,
            pads: &mut self.pads,
            config: &self.config,
        };
        let (actions, payload) = controller::caps::handle(&pad, caps, self.callbacks.as_mut(), &mut ctx)?;
        self.run_actions(actions, Some((pad, payload)))
    }

    fn on_incoming_event(&mut self, pad: PadRef, event: Event) -> Result<(), ElementError> {
        let mut ctx = Context {
            element_name: &self.name,
            pads: &mut self.pads,
            config: &self.config,
        };
        let (actions, payload, notice) =
            controller::event::handle(&pad, event, self.callbacks.as_mut(), &mut ctx)?;
        self.notify_parent_of_stream_boundary(&pad, notice);
        self.run_actions(actions, Some((pad, payload)))
    }

    fn notify_parent_of_stream_boundary(&self, pad: &PadRef, notice: controller::event::StreamNotice) {
        use controller::event::StreamNotice;
        match notice {
            StreamNotice::StartOfStream => {
                let _ = self.parent_mailbox.send(ToParent::StartOfStream {
                    child: self.name.clone(),
                    pad: pad.clone(),
                });
            }
            StreamNotice::EndOfStream => {
                let _ = self.parent_mailbox.send(ToParent::EndOfStream {
                    child: self.name.clone(),
                    pad: pad.clone(),
                });
            }
            StreamNotice::None => {}
        }
    }

    fn on_incoming_buffers(&mut self, pad: PadRef, buffers: Vec<Buffer>) -> Result<(), ElementError> {
        let mode = self.pads.get(&pad)?.mode;
        match mode {
            Mode::Pull => {
                self.pads.update(&pad, |r| {
                    let ib = r
                        .input_buffer
                        .as_mut()
                        .expect("pull input pad always has an input buffer");
                    ib.store(QueueItem::Buffers(buffers));
                })?;
                self.supply_demand(&pad, None)
            }
            Mode::Push => {
                let unit = self.pads.get(&pad)?.demand_unit.clone();
                let size = unit.size(&buffers);
                let mut ctx = Context {
                    element_name: &self.name,
                    pads: &mut self.pads,
                    config: &self.config,
                };
                let actions = controller::buffer::handle(&pad, buffers, self.callbacks.as_mut(), &mut ctx)?;
                if let Some(toilet) = self.pads.get(&pad)?.toilet.clone() {
                    toilet.sub(size as i64);
                }
                self.run_actions(actions, None)
            }
        }
    }

    fn invoke_demand_controller(&mut self, pad: &PadRef, size: u64) -> Result<(), ElementError> {
        self.pads.update(pad, |r| r.demand += size as i64)?;
        let mut ctx = Context {
            element_name: &self.name,
            pads: &mut self.pads,
            config: &self.config,
        };
        let actions = controller::demand::handle(pad, size, self.callbacks.as_mut(), &mut ctx)?;
        self.run_actions(actions, None)
    }

    // ---- the pull protocol (spec §4.3) -------------------------------

    /// `supply_demand`: sets the pad's demand (if `amount` is given), then
    /// either defers to `delayed_demands` if a drain is already in flight,
    /// or drains the input buffer once and dispatches everything that
    /// came out of it.
    fn supply_demand(&mut self, pad: &PadRef, amount: Option<DemandAmount>) -> Result<(), ElementError> {
        self.resolve_and_set_demand(pad, amount)?;

        if self.demand.is_supplying() {
            self.demand.defer(pad.clone(), DelayedAction::Supply);
            return Ok(());
        }

        self.demand.begin_supplying();
        let result = self.drain_input_and_dispatch(pad);
        self.demand.end_supplying();
        result?;
        self.drain_delayed()
    }

    fn resolve_and_set_demand(
        &mut self,
        pad: &PadRef,
        amount: Option<DemandAmount>,
    ) -> Result<(), ElementError> {
        let Some(amount) = amount else { return Ok(()) };
        let current = self.pads.get(pad)?.demand;
        let requested = match amount {
            DemandAmount::Set(v) => v,
            DemandAmount::Update(f) => f(current),
        };
        if requested < 0 {
            return Err(ContractError::NegativeDemand {
                pad: pad.clone(),
                requested,
            }
            .into());
        }
        self.pads.update(pad, |r| r.demand = requested)?;
        Ok(())
    }

    /// `handle_redemand`: a re-entry that lets the element recompute its
    /// demand via `handle_demand` with size `0`.
    fn handle_redemand(&mut self, pad: &PadRef) -> Result<(), ElementError> {
        if self.demand.is_supplying() {
            self.demand.defer(pad.clone(), DelayedAction::Redemand);
            return Ok(());
        }

        self.demand.begin_supplying();
        let result = self.redemand_step(pad);
        self.demand.end_supplying();
        result?;
        self.drain_delayed()
    }

    fn redemand_step(&mut self, pad: &PadRef) -> Result<(), ElementError> {
        let actions = {
            let mut ctx = Context {
                element_name: &self.name,
                pads: &mut self.pads,
                config: &self.config,
            };
            controller::demand::handle(pad, 0, self.callbacks.as_mut(), &mut ctx)?
        };
        self.run_actions(actions, None)
    }

    fn drain_delayed(&mut self) -> Result<(), ElementError> {
        while let Some((pad, action)) = self.demand.pop_random() {
            match action {
                DelayedAction::Supply => self.supply_demand(&pad, None)?,
                DelayedAction::Redemand => self.handle_redemand(&pad)?,
            }
        }
        Ok(())
    }

    fn drain_input_and_dispatch(&mut self, pad: &PadRef) -> Result<(), ElementError> {
        let current_demand = self.pads.get(pad)?.demand.max(0) as u64;
        if current_demand == 0 {
            return Ok(());
        }

        let unit = self.pads.get(pad)?.demand_unit.clone();
        let (status, items, deficit) = self.pads.update(pad, |r| {
            let ib = r
                .input_buffer
                .as_mut()
                .expect("pull input pad always has an input buffer");
            ib.take_and_demand(current_demand)
        })?;
        tracing::trace!(element = %self.name, %pad, ?status, drained = items.len(), "drained input buffer");

        let drained_units: u64 = items
            .iter()
            .map(|item| match item {
                QueueItem::Buffers(bs) => unit.size(bs),
                _ => 0,
            })
            .sum();
        self.pads.update(pad, |r| r.demand = (r.demand - drained_units as i64).max(0))?;

        if let Some(deficit) = deficit {
            if let Some(peer) = self.pads.get(pad)?.peer.clone() {
                let _ = peer.mailbox.send(ToElement::Demand {
                    pad: peer.pad,
                    size: deficit,
                });
            }
        }

        for item in items {
            match item {
                QueueItem::Caps(caps) => {
                    let mut ctx = Context {
                        element_name: &self.name,
                        pads: &mut self.pads,
                        config: &self.config,
                    };
                    let (actions, payload) =
                        controller::caps::handle(pad, caps, self.callbacks.as_mut(), &mut ctx)?;
                    self.run_actions(actions, Some((pad.clone(), payload)))?;
                }
                QueueItem::Event(event) => {
                    let mut ctx = Context {
                        element_name: &self.name,
                        pads: &mut self.pads,
                        config: &self.config,
                    };
                    let (actions, payload, notice) =
                        controller::event::handle(pad, event, self.callbacks.as_mut(), &mut ctx)?;
                    self.notify_parent_of_stream_boundary(pad, notice);
                    self.run_actions(actions, Some((pad.clone(), payload)))?;
                }
                QueueItem::Buffers(buffers) => {
                    let mut ctx = Context {
                        element_name: &self.name,
                        pads: &mut self.pads,
                        config: &self.config,
                    };
                    let actions =
                        controller::buffer::handle(pad, buffers, self.callbacks.as_mut(), &mut ctx)?;
                    self.run_actions(actions, None)?;
                }
            }
        }

        Ok(())
    }

    // ---- playback state machine (spec §4.5) --------------------------

    fn handle_change_playback_state(&mut self, target: PlaybackState) -> Result<(), ElementError> {
        let mut next = self.state_machine.request(target);
        while let Some(cb) = next {
            let actions = self.invoke_transition_callback(cb)?;
            self.run_actions(actions, None)?;
            next = self.state_machine.advance(cb);
            let state = self.state_machine.current();
            tracing::debug!(element = %self.name, %state, "playback state advanced");
            let _ = self.parent_mailbox.send(ToParent::PlaybackStateChanged {
                child: self.name.clone(),
                state,
            });
        }
        Ok(())
    }

    fn invoke_transition_callback(&mut self, cb: TransitionCallback) -> Result<Vec<Action>, ElementError> {
        let mut ctx = Context {
            element_name: &self.name,
            pads: &mut self.pads,
            config: &self.config,
        };
        match cb {
            TransitionCallback::StoppedToPrepared => self.callbacks.handle_stopped_to_prepared(&mut ctx),
            TransitionCallback::PreparedToPlaying => self.callbacks.handle_prepared_to_playing(&mut ctx),
            TransitionCallback::PlayingToPrepared => self.callbacks.handle_playing_to_prepared(&mut ctx),
            TransitionCallback::PreparedToStopped => self.callbacks.handle_prepared_to_stopped(&mut ctx),
        }
    }

    // ---- linking (spec §4.6) -----------------------------------------

    fn handle_link(&mut self, link_id: u64, this_pad: PadRef, peer: PeerRef) -> Result<(), ElementError> {
        if !self.pads.contains(&this_pad) {
            self.register_dynamic_pad(&this_pad)?;
        }
        self.pads.update(&this_pad, |r| {
            if r.mode == Mode::Push && r.direction == crate::pad::Direction::Output {
                r.peer_toilet = peer.toilet.clone();
            }
            r.peer = Some(peer);
        })?;
        let _ = self.parent_mailbox.send(ToParent::LinkResponse { link_id });
        Ok(())
    }

    fn register_dynamic_pad(&mut self, pad: &PadRef) -> Result<(), ElementError> {
        let template = self
            .pad_templates
            .iter()
            .find(|t| t.name.as_ref() == pad.name.as_ref() && t.availability == Availability::OnRequest)
            .cloned()
            .ok_or_else(|| LinkError::UnknownPad(pad.clone()))?;
        self.pads.register(pad.clone(), &template, self.config.toilet_overflow_threshold);
        Ok(())
    }

    // ---- catch-all ------------------------------------------------------

    fn on_other(&mut self, payload: Arc<dyn Any + Send + Sync>) -> Result<(), ElementError> {
        let actions = {
            let mut ctx = Context {
                element_name: &self.name,
                pads: &mut self.pads,
                config: &self.config,
            };
            self.callbacks.handle_other(payload, &mut ctx)?
        };
        self.run_actions(actions, None)
    }

    // ---- action interpretation (spec §4.4 "Action interpretation") ----

    fn run_actions(
        &mut self,
        actions: Vec<Action>,
        forward_source: Option<(PadRef, ForwardPayload)>,
    ) -> Result<(), ElementError> {
        for action in actions {
            match action {
                Action::Buffer { pad, buffers } => self.emit_buffer(&pad, buffers)?,
                Action::Caps { pad, caps } => self.emit_caps(&pad, caps)?,
                Action::Event { pad, event } => self.emit_event(&pad, event)?,
                Action::Demand { pad, amount } => self.supply_demand(&pad, Some(amount))?,
                Action::Redemand { pad } => self.handle_redemand(&pad)?,
                Action::Forward { target } => self.forward(target, forward_source.as_ref())?,
                Action::Notify { payload } => {
                    let _ = self.parent_mailbox.send(ToParent::Notification {
                        child: self.name.clone(),
                        payload,
                    });
                }
                Action::PlaybackChangeSuccessful => {
                    tracing::trace!(element = %self.name, "callback confirmed playback change");
                }
            }
        }
        Ok(())
    }

    fn forward(
        &mut self,
        target: ForwardTarget,
        source: Option<&(PadRef, ForwardPayload)>,
    ) -> Result<(), ElementError> {
        let Some((origin, payload)) = source else {
            tracing::warn!(element = %self.name, "forward action with no forwardable item in context");
            return Ok(());
        };
        let targets: Vec<PadRef> = match target {
            ForwardTarget::Pads(pads) => pads,
            ForwardTarget::All => {
                let opposite = self.pads.get(origin)?.direction.opposite();
                self.pads.iter_direction(opposite).cloned().collect()
            }
        };
        for pad in targets {
            match payload {
                ForwardPayload::Caps(c) => self.emit_caps(&pad, c.clone())?,
                ForwardPayload::Event(e) => self.emit_event(&pad, e.clone())?,
            }
        }
        Ok(())
    }

    fn emit_caps(&mut self, pad: &PadRef, caps: Caps) -> Result<(), ElementError> {
        let peer = self.pads.update(pad, |r| {
            r.negotiated_caps = Some(caps.clone());
            r.caps_sent = true;
            r.peer.clone()
        })?;
        if let Some(peer) = peer {
            if peer.mailbox.send(ToElement::Caps { pad: peer.pad, caps }).is_err() {
                tracing::warn!(element = %self.name, %pad, "peer mailbox closed, dropping caps");
            }
        }
        Ok(())
    }

    fn emit_event(&mut self, pad: &PadRef, event: Event) -> Result<(), ElementError> {
        let record = self.pads.get(pad)?;
        match &event {
            Event::StartOfStream if record.start_of_stream_sent => {
                return Err(ContractError::DuplicateStreamEvent {
                    pad: pad.clone(),
                    kind: "start_of_stream",
                }
                .into());
            }
            Event::EndOfStream if record.end_of_stream_sent => {
                return Err(ContractError::DuplicateStreamEvent {
                    pad: pad.clone(),
                    kind: "end_of_stream",
                }
                .into());
            }
            _ => {}
        }

        let peer = self.pads.update(pad, |r| {
            match &event {
                Event::StartOfStream => r.start_of_stream_sent = true,
                Event::EndOfStream => r.end_of_stream_sent = true,
                Event::Custom { .. } => {}
            }
            r.peer.clone()
        })?;
        if let Some(peer) = peer {
            if peer.mailbox.send(ToElement::Event { pad: peer.pad, event }).is_err() {
                tracing::warn!(element = %self.name, %pad, "peer mailbox closed, dropping event");
            }
        }
        Ok(())
    }

    fn emit_buffer(&mut self, pad: &PadRef, buffers: Vec<Buffer>) -> Result<(), ElementError> {
        let record = self.pads.get(pad)?;
        if !record.caps_sent {
            return Err(ContractError::BufferBeforeCaps { pad: pad.clone() }.into());
        }
        let unit = record.demand_unit.clone();
        let mode = record.mode;
        let size = unit.size(&buffers) as i64;

        match mode {
            Mode::Pull => {
                self.pads.update(pad, |r| r.demand -= size)?;
                if self.pads.get(pad)?.demand < 0 {
                    tracing::warn!(element = %self.name, %pad, "output pad over-drained its granted demand");
                }
            }
            Mode::Push => {
                if let Some(toilet) = self.pads.get(pad)?.peer_toilet.clone() {
                    let level = toilet.add(size);
                    if level > toilet.threshold() {
                        tracing::error!(
                            element = %self.name, %pad, level, threshold = toilet.threshold(),
                            "toilet overflow, killing producer"
                        );
                        return Err(ToiletOverflowError {
                            pad: pad.clone(),
                            size: level,
                            threshold: toilet.threshold(),
                        }
                        .into());
                    }
                }
            }
        }

        let peer = self.pads.get(pad)?.peer.clone();
        if let Some(peer) = peer {
            if peer.mailbox.send(ToElement::Buffers { pad: peer.pad, buffers }).is_err() {
                tracing::warn!(element = %self.name, %pad, "peer mailbox closed, dropping buffers");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::CallbackResult;
    use crate::caps::CapsConstraint;
    use crate::pad::{Direction, DemandUnit, PadInfo};

    fn new_actor(callbacks: Box<dyn ElementCallbacks>) -> (ElementActor, flume::Receiver<ToParent>) {
        let (parent_tx, parent_rx) = flume::unbounded();
        let (actor, _mailbox, _in_pads, _out_pads, _toilets) =
            ElementActor::new("e".into(), callbacks, RuntimeConfig::default(), parent_tx);
        (actor, parent_rx)
    }

    fn link_pair(a: &mut ElementActor, a_pad: &str, b_tx: flume::Sender<ToElement>, b_pad: PadRef) {
        a.pads
            .update(&PadRef::new("e", a_pad.to_string()), |r| {
                r.peer = Some(PeerRef {
                    pad: b_pad,
                    mailbox: b_tx,
                    toilet: None,
                });
            })
            .unwrap();
    }

    struct SourceNoCaps;
    impl ElementCallbacks for SourceNoCaps {
        fn known_output_pads(&self) -> Vec<PadInfo> {
            vec![PadInfo::new("src", Direction::Output, crate::pad::Mode::Pull)]
        }
        fn handle_demand(
            &mut self,
            pad: &PadRef,
            _size: u64,
            _unit: &DemandUnit,
            _ctx: &mut Context,
        ) -> CallbackResult {
            Ok(vec![Action::buffer(pad.clone(), vec![Buffer::new(&b"x"[..])])])
        }
    }

    #[test]
    fn emitting_a_buffer_before_caps_is_a_contract_error() {
        let (mut actor, _parent_rx) = new_actor(Box::new(SourceNoCaps));
        let (sink_tx, _sink_rx) = flume::unbounded();
        link_pair(&mut actor, "src", sink_tx, PadRef::new("sink", "in"));

        let err = actor.invoke_demand_controller(&PadRef::new("e", "src"), 1).unwrap_err();
        assert!(matches!(err, ElementError::Contract(ContractError::BufferBeforeCaps { .. })));
    }

    struct PushSource;
    impl ElementCallbacks for PushSource {
        fn known_output_pads(&self) -> Vec<PadInfo> {
            vec![PadInfo::new("src", Direction::Output, crate::pad::Mode::Push)]
        }
    }

    #[test]
    fn toilet_overflow_kills_the_producer() {
        let (mut actor, _parent_rx) = new_actor(Box::new(PushSource));
        let (sink_tx, _sink_rx) = flume::unbounded();
        let pad = PadRef::new("e", "src");
        actor
            .pads
            .update(&pad, |r| {
                r.caps_sent = true;
                r.peer = Some(PeerRef {
                    pad: PadRef::new("sink", "in"),
                    mailbox: sink_tx,
                    toilet: None,
                });
                r.peer_toilet = Some(crate::toilet::Toilet::new(200));
            })
            .unwrap();

        let mut err = None;
        for _ in 0..201 {
            if let Err(e) = actor.emit_buffer(&pad, vec![Buffer::new(&b"x"[..])]) {
                err = Some(e);
                break;
            }
        }
        assert!(matches!(err, Some(ElementError::ToiletOverflow(_))));
    }

    struct Filter;
    impl ElementCallbacks for Filter {
        fn known_input_pads(&self) -> Vec<PadInfo> {
            vec![PadInfo::new("in", Direction::Input, crate::pad::Mode::Pull)
                .with_caps(CapsConstraint::Any)]
        }
        fn known_output_pads(&self) -> Vec<PadInfo> {
            vec![PadInfo::new("out", Direction::Output, crate::pad::Mode::Pull)]
        }
    }

    #[test]
    fn forward_all_caps_reaches_every_output_pad() {
        let (mut actor, _parent_rx) = new_actor(Box::new(Filter));
        let (down_tx, down_rx) = flume::unbounded();
        link_pair(&mut actor, "out", down_tx, PadRef::new("sink", "in"));

        actor.on_incoming_caps(PadRef::new("e", "in"), Caps::new("audio/x-raw")).unwrap();

        let forwarded = down_rx.try_recv().unwrap();
        assert!(matches!(forwarded, ToElement::Caps { .. }));
    }

    #[test]
    fn redemand_while_supplying_is_deferred_not_nested() {
        let (mut actor, _parent_rx) = new_actor(Box::new(Filter));
        actor.demand.begin_supplying();
        actor.handle_redemand(&PadRef::new("e", "out")).unwrap();
        assert!(actor.demand.has_delayed());
        actor.demand.end_supplying();
    }
}
