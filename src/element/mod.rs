//! The element actor (spec §2 "Element actor", §4.1–§4.5): hosts one
//! element's callbacks, owns its `PadModel`, and consumes its mailbox.

pub mod actor;
pub mod handle;

pub use actor::ElementActor;
pub use handle::{spawn_parts, ElementHandle};
