//! Error kinds of the element runtime (spec §7).
//!
//! The framework errs toward fail-fast crash-and-propagate: a [`ElementError`]
//! terminates the element task that raised it, and the owning parent decides
//! whether to tear down the rest of the subtree.

use crate::pad::PadRef;
use std::fmt;

/// Raised synchronously inside a stream controller when a contract invariant
/// is violated. Fatal to the element that raised it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContractError {
    /// A buffer was emitted on a pad before caps were sent on it.
    #[error("buffer on pad {pad} rejected: caps not sent")]
    BufferBeforeCaps { pad: PadRef },

    /// A buffer arrived on a pad that already saw `end_of_stream`.
    #[error("buffer on pad {pad} rejected: end of stream already sent")]
    BufferAfterEndOfStream { pad: PadRef },

    /// `supply_demand` was asked to set a pad's demand below zero.
    #[error("negative demand requested on pad {pad}: {requested}")]
    NegativeDemand { pad: PadRef, requested: i64 },

    /// Caps received on a pad do not satisfy its declared constraint.
    #[error("caps on pad {pad} do not match declared constraint: {caps:?}")]
    CapsMismatch { pad: PadRef, caps: crate::caps::Caps },

    /// A second `start_of_stream` or `end_of_stream` was observed on a pad.
    #[error("duplicate {kind} event on pad {pad}")]
    DuplicateStreamEvent { pad: PadRef, kind: &'static str },
}

/// An element callback returned `{error, reason}` or panicked.
#[derive(Debug, Clone, thiserror::Error)]
#[error("callback error on element {element}: {reason}")]
pub struct CallbackError {
    pub element: String,
    pub reason: String,
}

/// A push-mode consumer could not keep up; the producer has been killed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("toilet overflow on pad {pad}: {size} units buffered (threshold {threshold})")]
pub struct ToiletOverflowError {
    pub pad: PadRef,
    pub size: i64,
    pub threshold: i64,
}

/// A link request targeted an unknown pad, or duplicated an existing link.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    #[error("unknown pad referenced in link: {0}")]
    UnknownPad(PadRef),
    #[error("pad {0} is already linked")]
    AlreadyLinked(PadRef),
    #[error("link endpoints have incompatible direction: {from} -> {to}")]
    DirectionMismatch { from: PadRef, to: PadRef },
}

/// PadModel access with an unregistered pad reference. Programmer error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown pad: {0}")]
pub struct UnknownPad(pub PadRef);

/// The sum of everything that can terminate an element task.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ElementError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Callback(#[from] CallbackError),
    #[error(transparent)]
    ToiletOverflow(#[from] ToiletOverflowError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    UnknownPad(#[from] UnknownPad),
}

impl ElementError {
    /// True for errors that must propagate as a fatal crash of the whole
    /// containing subtree, rather than being left to parent discretion.
    pub fn is_fatal_to_subtree(&self) -> bool {
        matches!(self, ElementError::Contract(_) | ElementError::ToiletOverflow(_))
    }
}

/// Why a child task's slot in the supervision tree finished.
#[derive(Debug)]
pub enum ChildExit {
    /// Clean shutdown requested by the parent.
    Normal,
    /// The child's message loop returned an [`ElementError`].
    Crash(ElementError),
    /// The child did not exit within the configured grace period and was
    /// force-aborted.
    Killed,
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildExit::Normal => write!(f, "normal"),
            ChildExit::Crash(e) => write!(f, "child_crash: {e}"),
            ChildExit::Killed => write!(f, "killed"),
        }
    }
}
