//! Pad identity and declaration (spec §3 "Pad", §6 "Pad declaration").

use crate::buffer::Buffer;
use crate::caps::CapsConstraint;
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// Direction a pad carries stream items in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }
}

/// Whether a pad is driven by demand (pull) or self-paced (push).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Pull,
    Push,
}

/// When a pad comes into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Always,
    OnRequest,
}

/// Unit buffer sizes are measured in, for demand accounting (spec §3, §4.2).
#[derive(Clone)]
pub enum DemandUnit {
    Buffers,
    Bytes,
    Custom(fn(&[Buffer]) -> u64),
}

impl fmt::Debug for DemandUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandUnit::Buffers => write!(f, "Buffers"),
            DemandUnit::Bytes => write!(f, "Bytes"),
            DemandUnit::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl DemandUnit {
    /// Computes the size of a batch of buffers in this pad's demand unit.
    pub fn size(&self, buffers: &[Buffer]) -> u64 {
        match self {
            DemandUnit::Buffers => buffers.len() as u64,
            DemandUnit::Bytes => buffers.iter().map(|b| b.len() as u64).sum(),
            DemandUnit::Custom(f) => f(buffers),
        }
    }
}

/// Identity of a pad: `(element, name, optional dynamic-instance-id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PadRef {
    pub element: String,
    pub name: Cow<'static, str>,
    pub instance: Option<u64>,
}

impl PadRef {
    pub fn new(element: impl Into<String>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            element: element.into(),
            name: name.into(),
            instance: None,
        }
    }

    pub fn with_instance(mut self, instance: u64) -> Self {
        self.instance = Some(instance);
        self
    }
}

impl fmt::Display for PadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instance {
            Some(i) => write!(f, "{}:{}#{}", self.element, self.name, i),
            None => write!(f, "{}:{}", self.element, self.name),
        }
    }
}

/// Static declaration of one of an element's pads (`known_input_pads` /
/// `known_output_pads`).
#[derive(Clone)]
pub struct PadInfo {
    pub name: Cow<'static, str>,
    pub direction: Direction,
    pub availability: Availability,
    pub mode: Mode,
    pub caps: CapsConstraint,
    pub demand_unit: DemandUnit,
    pub preferred_size: u64,
    /// Per-pad override of the toilet overflow threshold; `None` defers to
    /// `RuntimeConfig::toilet_overflow_threshold`.
    pub toilet_threshold: Option<i64>,
}

impl PadInfo {
    pub fn new(name: impl Into<Cow<'static, str>>, direction: Direction, mode: Mode) -> Self {
        Self {
            name: name.into(),
            direction,
            availability: Availability::Always,
            mode,
            caps: CapsConstraint::Any,
            demand_unit: DemandUnit::Buffers,
            preferred_size: 10,
            toilet_threshold: None,
        }
    }

    pub fn on_request(mut self) -> Self {
        self.availability = Availability::OnRequest;
        self
    }

    pub fn with_caps(mut self, caps: CapsConstraint) -> Self {
        self.caps = caps;
        self
    }

    pub fn with_demand_unit(mut self, unit: DemandUnit) -> Self {
        self.demand_unit = unit;
        self
    }

    pub fn with_preferred_size(mut self, size: u64) -> Self {
        self.preferred_size = size;
        self
    }
}
