//! Immutable media payload units (spec §3 "Buffer").

use bytes::Bytes;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// An immutable payload unit flowing along a link. Once constructed, a
/// `Buffer` is never mutated — cloning is a cheap refcount bump on the
/// underlying `Bytes`.
#[derive(Clone)]
pub struct Buffer {
    payload: Bytes,
    pts: Option<Duration>,
    metadata: Option<Arc<dyn Any + Send + Sync>>,
}

impl Buffer {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            pts: None,
            metadata: None,
        }
    }

    pub fn with_pts(mut self, pts: Duration) -> Self {
        self.pts = Some(pts);
        self
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn Any + Send + Sync>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn pts(&self) -> Option<Duration> {
        self.pts
    }

    pub fn metadata(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.metadata.as_ref()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.payload.len())
            .field("pts", &self.pts)
            .finish()
    }
}
