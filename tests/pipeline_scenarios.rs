//! End-to-end scenarios driven through a real `Pipeline`: these exercise
//! the actor mailbox loop, the parent dispatcher, and the link handshake
//! together, rather than any single controller in isolation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use streamrt::error::CallbackError;
use streamrt::{
    Action, Buffer, CallbackResult, Caps, Context, DemandAmount, DemandUnit, Direction,
    ElementCallbacks, ElementError, Event, Mode, PadInfo, PadRef, Pipeline, RuntimeConfig,
};

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ---- scenario: a buffer emitted before caps crashes its source ----------

struct NoCapsSource;
impl ElementCallbacks for NoCapsSource {
    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Push)]
    }

    fn handle_prepared_to_playing(&mut self, ctx: &mut Context) -> CallbackResult {
        let pad = PadRef::new(ctx.element_name.to_string(), "out");
        Ok(vec![Action::buffer(pad, vec![Buffer::new(&b"x"[..])])])
    }
}

#[tokio::test]
async fn buffer_before_caps_crashes_the_pipeline() {
    let mut pipeline = Pipeline::new("p-contract", RuntimeConfig::default());
    pipeline.add_element("source", Box::new(NoCapsSource));
    let handle = pipeline.start();
    handle.play();

    let err = handle.join().await.expect_err("source should crash before ever sending caps");
    let msg = err.to_string().to_lowercase();
    assert!(msg.contains("buffer"));
    assert!(msg.contains("caps"));
    assert!(msg.contains("not sent"));
}

// ---- scenario: happy path, caps then buffers then end of stream ---------

struct CapsThenBuffersSource {
    sent_caps: bool,
    buffers_sent: usize,
    eos_sent: bool,
}

impl CapsThenBuffersSource {
    fn new() -> Self {
        Self {
            sent_caps: false,
            buffers_sent: 0,
            eos_sent: false,
        }
    }
}

impl ElementCallbacks for CapsThenBuffersSource {
    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Pull)]
    }

    fn handle_demand(
        &mut self,
        pad: &PadRef,
        _size: u64,
        _unit: &DemandUnit,
        _ctx: &mut Context,
    ) -> CallbackResult {
        let mut actions = Vec::new();
        if !self.sent_caps {
            actions.push(Action::caps(pad.clone(), Caps::new("video/x-raw")));
            actions.push(Action::event(pad.clone(), Event::StartOfStream));
            self.sent_caps = true;
        }
        if self.buffers_sent < 3 {
            actions.push(Action::buffer(pad.clone(), vec![Buffer::new(&b"x"[..])]));
            self.buffers_sent += 1;
        } else if !self.eos_sent {
            actions.push(Action::event(pad.clone(), Event::EndOfStream));
            self.eos_sent = true;
        }
        Ok(actions)
    }
}

struct PullSink;
impl ElementCallbacks for PullSink {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("in", Direction::Input, Mode::Pull)]
    }

    fn handle_prepared_to_playing(&mut self, ctx: &mut Context) -> CallbackResult {
        let pad = PadRef::new(ctx.element_name.to_string(), "in");
        Ok(vec![Action::Demand {
            pad,
            amount: DemandAmount::Set(5),
        }])
    }
}

#[tokio::test]
async fn happy_path_reaches_start_of_stream_and_terminates_cleanly() {
    let mut pipeline = Pipeline::new("p-happy", RuntimeConfig::default());
    pipeline.add_element("source", Box::new(CapsThenBuffersSource::new()));
    pipeline.add_element("sink", Box::new(PullSink));
    pipeline
        .link(PadRef::new("source", "out"), PadRef::new("sink", "in"))
        .unwrap();
    let probe = pipeline.probe();

    let handle = pipeline.start();
    handle.play();
    settle().await;

    probe.assert_start_of_stream("sink", "in");
    assert!(probe.has_seen_end_of_stream("sink", "in"));

    handle.terminate(true).await.expect("clean subtree should terminate without error");
}

// ---- scenario: backpressure keeps demand within the sink's preferred_size

struct BackpressureSource {
    sent_caps: bool,
    demand_sizes: Arc<Mutex<Vec<u64>>>,
}

impl ElementCallbacks for BackpressureSource {
    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Pull)]
    }

    fn handle_demand(
        &mut self,
        pad: &PadRef,
        size: u64,
        _unit: &DemandUnit,
        _ctx: &mut Context,
    ) -> CallbackResult {
        self.demand_sizes.lock().push(size);
        let mut actions = Vec::new();
        if !self.sent_caps {
            actions.push(Action::caps(pad.clone(), Caps::new("video/x-raw")));
            self.sent_caps = true;
        }
        // A rate-limited producer: one buffer per demand round, regardless
        // of how much was asked for.
        actions.push(Action::buffer(pad.clone(), vec![Buffer::new(&b"x"[..])]));
        Ok(actions)
    }
}

struct BackpressureSink {
    processed: Arc<Mutex<usize>>,
}

impl ElementCallbacks for BackpressureSink {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("in", Direction::Input, Mode::Pull)]
    }

    fn handle_prepared_to_playing(&mut self, ctx: &mut Context) -> CallbackResult {
        let pad = PadRef::new(ctx.element_name.to_string(), "in");
        Ok(vec![Action::Demand {
            pad,
            amount: DemandAmount::Set(10),
        }])
    }

    fn handle_process(&mut self, _pad: &PadRef, buffers: Vec<Buffer>, _ctx: &mut Context) -> CallbackResult {
        *self.processed.lock() += buffers.len();
        Ok(vec![])
    }
}

#[tokio::test]
async fn backpressure_keeps_demand_within_preferred_size() {
    let demand_sizes = Arc::new(Mutex::new(Vec::new()));
    let processed = Arc::new(Mutex::new(0usize));

    let mut pipeline = Pipeline::new("p-backpressure", RuntimeConfig::default());
    pipeline.add_element(
        "source",
        Box::new(BackpressureSource {
            sent_caps: false,
            demand_sizes: demand_sizes.clone(),
        }),
    );
    pipeline.add_element(
        "sink",
        Box::new(BackpressureSink {
            processed: processed.clone(),
        }),
    );
    pipeline
        .link(PadRef::new("source", "out"), PadRef::new("sink", "in"))
        .unwrap();

    let handle = pipeline.start();
    handle.play();
    settle().await;

    let sizes = demand_sizes.lock().clone();
    assert!(sizes.len() >= 2, "handle_demand must be invoked repeatedly, got {sizes:?}");
    assert!(
        sizes.iter().all(|&s| s <= 10),
        "a sink with preferred_size 10 must never be asked to hold more than 10 buffers in flight: {sizes:?}"
    );
    assert_eq!(
        *processed.lock(),
        10,
        "sink's own granted demand (10) bounds the total it ever drains"
    );

    handle.terminate(true).await.expect("pipeline should terminate cleanly");
}

// ---- scenario: a push producer outruns a stalled consumer's toilet ------

struct OverflowSource;
impl ElementCallbacks for OverflowSource {
    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Push)]
    }

    fn handle_prepared_to_playing(&mut self, ctx: &mut Context) -> CallbackResult {
        let pad = PadRef::new(ctx.element_name.to_string(), "out");
        let buffers: Vec<Buffer> = (0..300).map(|_| Buffer::new(&b"x"[..])).collect();
        Ok(vec![
            Action::caps(pad.clone(), Caps::new("video/x-raw")),
            Action::buffer(pad, buffers),
        ])
    }
}

struct StalledSink;
impl ElementCallbacks for StalledSink {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("in", Direction::Input, Mode::Push)]
    }
}

#[tokio::test]
async fn push_producer_is_killed_on_toilet_overflow() {
    let mut pipeline = Pipeline::new("p-toilet", RuntimeConfig::default());
    pipeline.add_element("source", Box::new(OverflowSource));
    pipeline.add_element("sink", Box::new(StalledSink));
    pipeline
        .link(PadRef::new("source", "out"), PadRef::new("sink", "in"))
        .unwrap();

    let handle = pipeline.start();
    handle.play();

    let err = handle.join().await.expect_err("300 buffers against a threshold of 200 must overflow");
    assert!(matches!(err, ElementError::ToiletOverflow(ref e) if e.size >= 201));
    assert!(err.to_string().to_lowercase().contains("toilet overflow"));
}

// ---- scenario: a mid-process redemand is deferred, not nested -----------

struct NumberedSource {
    sent_caps: bool,
    eos_sent: bool,
    next: u32,
    total: u32,
}

impl ElementCallbacks for NumberedSource {
    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Pull)]
    }

    fn handle_demand(
        &mut self,
        pad: &PadRef,
        _size: u64,
        _unit: &DemandUnit,
        _ctx: &mut Context,
    ) -> CallbackResult {
        let mut actions = Vec::new();
        if !self.sent_caps {
            actions.push(Action::caps(pad.clone(), Caps::new("video/x-raw")));
            self.sent_caps = true;
        }
        if self.next < self.total {
            actions.push(Action::buffer(
                pad.clone(),
                vec![Buffer::new(self.next.to_string().into_bytes())],
            ));
            self.next += 1;
        } else if !self.eos_sent {
            actions.push(Action::event(pad.clone(), Event::EndOfStream));
            self.eos_sent = true;
        }
        Ok(actions)
    }
}

/// A relay filter whose first `handle_process` call issues a `redemand` on
/// its own output pad in the same action list — re-entrant because this
/// call runs inside the `supply_demand` that's already draining that pad.
struct RedemandRelayFilter {
    redemand_issued: bool,
}

impl ElementCallbacks for RedemandRelayFilter {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("in", Direction::Input, Mode::Pull)]
    }

    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Pull)]
    }

    fn handle_demand(
        &mut self,
        _pad: &PadRef,
        size: u64,
        _unit: &DemandUnit,
        ctx: &mut Context,
    ) -> CallbackResult {
        let in_pad = PadRef::new(ctx.element_name.to_string(), "in");
        Ok(vec![Action::Demand {
            pad: in_pad,
            amount: DemandAmount::Update(Arc::new(move |current| current + size as i64)),
        }])
    }

    fn handle_process(&mut self, _pad: &PadRef, buffers: Vec<Buffer>, ctx: &mut Context) -> CallbackResult {
        let out_pad = PadRef::new(ctx.element_name.to_string(), "out");
        let mut actions = vec![Action::buffer(out_pad.clone(), buffers)];
        if !self.redemand_issued {
            self.redemand_issued = true;
            actions.push(Action::redemand(out_pad));
        }
        Ok(actions)
    }
}

struct SequenceSink {
    observed: Arc<Mutex<Vec<u32>>>,
}

impl ElementCallbacks for SequenceSink {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("in", Direction::Input, Mode::Pull)]
    }

    fn handle_prepared_to_playing(&mut self, ctx: &mut Context) -> CallbackResult {
        let pad = PadRef::new(ctx.element_name.to_string(), "in");
        Ok(vec![Action::Demand {
            pad,
            amount: DemandAmount::Set(20),
        }])
    }

    fn handle_process(&mut self, _pad: &PadRef, buffers: Vec<Buffer>, _ctx: &mut Context) -> CallbackResult {
        let mut observed = self.observed.lock();
        for buffer in &buffers {
            let text = std::str::from_utf8(buffer.payload()).unwrap();
            observed.push(text.parse().unwrap());
        }
        Ok(vec![])
    }
}

#[tokio::test]
async fn reentrant_redemand_preserves_source_emission_order() {
    let observed = Arc::new(Mutex::new(Vec::new()));

    let mut pipeline = Pipeline::new("p-redemand", RuntimeConfig::default());
    pipeline.add_element(
        "source",
        Box::new(NumberedSource {
            sent_caps: false,
            eos_sent: false,
            next: 0,
            total: 5,
        }),
    );
    pipeline.add_element("filter", Box::new(RedemandRelayFilter { redemand_issued: false }));
    pipeline.add_element("sink", Box::new(SequenceSink { observed: observed.clone() }));
    pipeline
        .link(PadRef::new("source", "out"), PadRef::new("filter", "in"))
        .unwrap();
    pipeline
        .link(PadRef::new("filter", "out"), PadRef::new("sink", "in"))
        .unwrap();

    let handle = pipeline.start();
    handle.play();
    settle().await;

    assert_eq!(
        observed.lock().clone(),
        vec![0, 1, 2, 3, 4],
        "buffer order at sink input must equal source emission order despite the mid-process redemand"
    );

    handle.terminate(true).await.expect("pipeline should terminate cleanly");
}

// ---- scenario: a filter crash takes its whole pipeline down -------------

struct SimpleSource {
    sent_caps: bool,
}

impl ElementCallbacks for SimpleSource {
    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Pull)]
    }

    fn handle_demand(
        &mut self,
        pad: &PadRef,
        _size: u64,
        _unit: &DemandUnit,
        _ctx: &mut Context,
    ) -> CallbackResult {
        let mut actions = Vec::new();
        if !self.sent_caps {
            actions.push(Action::caps(pad.clone(), Caps::new("video/x-raw")));
            self.sent_caps = true;
        }
        actions.push(Action::buffer(pad.clone(), vec![Buffer::new(&b"x"[..])]));
        Ok(actions)
    }
}

struct CrashFilter;
impl ElementCallbacks for CrashFilter {
    fn known_input_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("in", Direction::Input, Mode::Pull)]
    }

    fn known_output_pads(&self) -> Vec<PadInfo> {
        vec![PadInfo::new("out", Direction::Output, Mode::Pull)]
    }

    fn handle_prepared_to_playing(&mut self, ctx: &mut Context) -> CallbackResult {
        let pad = PadRef::new(ctx.element_name.to_string(), "in");
        Ok(vec![Action::Demand {
            pad,
            amount: DemandAmount::Set(3),
        }])
    }

    fn handle_process(&mut self, _pad: &PadRef, _buffers: Vec<Buffer>, ctx: &mut Context) -> CallbackResult {
        Err(CallbackError {
            element: ctx.element_name.to_string(),
            reason: "boom".to_string(),
        }
        .into())
    }
}

struct Idle;
impl ElementCallbacks for Idle {}

#[tokio::test]
async fn filter_crash_takes_down_the_whole_pipeline() {
    let mut pipeline = Pipeline::new("p-crash", RuntimeConfig::default());
    pipeline.add_element("source", Box::new(SimpleSource { sent_caps: false }));
    pipeline.add_element("filter", Box::new(CrashFilter));
    pipeline.add_element("logger", Box::new(Idle));
    pipeline
        .link(PadRef::new("source", "out"), PadRef::new("filter", "in"))
        .unwrap();

    let handle = pipeline.start();
    handle.play();

    let err = handle
        .join()
        .await
        .expect_err("a handle_process error must crash the filter and its whole pipeline");
    assert!(matches!(err, ElementError::Callback(_)));
    assert!(err.to_string().to_lowercase().contains("boom"));
}
