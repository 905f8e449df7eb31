//! An actor-model media streaming runtime: elements run as independent
//! tasks connected by typed pads, dispatched either demand-driven (pull)
//! or self-paced with backpressure (push), supervised by parents that
//! walk a shared playback state machine and crash the subtree fail-fast
//! on a contract violation.

pub mod action;
pub mod bin;
pub mod buffer;
pub mod callbacks;
pub mod caps;
pub mod config;
pub mod controller;
pub mod demand;
pub mod element;
pub mod error;
pub mod event;
pub mod input_buffer;
pub mod message;
pub mod pad;
pub mod pad_model;
pub mod parent;
pub mod pipeline;
pub mod state_machine;
pub mod testing;
pub mod toilet;

pub use action::{Action, DemandAmount, ForwardTarget};
pub use bin::Bin;
pub use buffer::Buffer;
pub use callbacks::{CallbackResult, Context, ElementCallbacks};
pub use caps::{Caps, CapsConstraint};
pub use config::RuntimeConfig;
pub use error::{ChildExit, ContractError, ElementError};
pub use event::Event;
pub use pad::{Availability, DemandUnit, Direction, Mode, PadInfo, PadRef};
pub use pipeline::{Pipeline, PipelineHandle};
pub use state_machine::PlaybackState;
