//! Typed control signals traveling with buffers (spec §3 "Event").

use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub enum Event {
    StartOfStream,
    EndOfStream,
    Custom {
        name: String,
        payload: Arc<dyn Any + Send + Sync>,
    },
}

impl Event {
    pub fn custom(name: impl Into<String>, payload: Arc<dyn Any + Send + Sync>) -> Self {
        Event::Custom {
            name: name.into(),
            payload,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::StartOfStream => "start_of_stream",
            Event::EndOfStream => "end_of_stream",
            Event::Custom { .. } => "custom",
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::StartOfStream => write!(f, "StartOfStream"),
            Event::EndOfStream => write!(f, "EndOfStream"),
            Event::Custom { name, .. } => write!(f, "Custom({name})"),
        }
    }
}
