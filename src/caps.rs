//! Stream format descriptors (spec §3 "Caps").
//!
//! Caps are opaque to the runtime beyond structural equality: the element
//! runtime never interprets field values, it only compares and forwards
//! them.

use std::collections::BTreeMap;

/// A single field value inside a [`Caps`] descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum CapsValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// A structured descriptor of stream format, e.g. audio sample rate or
/// frame layout. Compared by structural equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Caps {
    pub media_type: String,
    pub fields: BTreeMap<String, CapsValue>,
}

impl Caps {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: CapsValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CapsValue> {
        self.fields.get(key)
    }

    /// True if `self` satisfies `pattern`: same media type, and every field
    /// set in `pattern` is present and equal in `self`. Fields absent from
    /// `pattern` are wildcards.
    pub fn matches_pattern(&self, pattern: &Caps) -> bool {
        if self.media_type != pattern.media_type {
            return false;
        }
        pattern
            .fields
            .iter()
            .all(|(k, v)| self.fields.get(k) == Some(v))
    }
}

/// Declared per-pad caps constraint (spec §6 "Pad declaration").
#[derive(Debug, Clone)]
pub enum CapsConstraint {
    Any,
    OneOf(Vec<Caps>),
}

impl CapsConstraint {
    pub fn accepts(&self, caps: &Caps) -> bool {
        match self {
            CapsConstraint::Any => true,
            CapsConstraint::OneOf(patterns) => {
                patterns.iter().any(|p| caps.matches_pattern(p))
            }
        }
    }
}
