//! Playback states and transitions (spec §3 "Lifecycle", §4.5).

use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    Stopped,
    Prepared,
    Playing,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Prepared => write!(f, "prepared"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

impl PlaybackState {
    fn rank(self) -> i8 {
        match self {
            PlaybackState::Stopped => 0,
            PlaybackState::Prepared => 1,
            PlaybackState::Playing => 2,
        }
    }

    /// The single adjacent state one step closer to `target`, or `None` if
    /// already there.
    fn step_toward(self, target: PlaybackState) -> Option<PlaybackState> {
        match self.rank().cmp(&target.rank()) {
            std::cmp::Ordering::Less => Some(match self {
                PlaybackState::Stopped => PlaybackState::Prepared,
                PlaybackState::Prepared => PlaybackState::Playing,
                PlaybackState::Playing => unreachable!("playing is the top rank"),
            }),
            std::cmp::Ordering::Greater => Some(match self {
                PlaybackState::Playing => PlaybackState::Prepared,
                PlaybackState::Prepared => PlaybackState::Stopped,
                PlaybackState::Stopped => unreachable!("stopped is the bottom rank"),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// One named element callback invoked on a transition edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCallback {
    StoppedToPrepared,
    PreparedToPlaying,
    PlayingToPrepared,
    PreparedToStopped,
}

impl TransitionCallback {
    fn between(from: PlaybackState, to: PlaybackState) -> Self {
        use PlaybackState::*;
        match (from, to) {
            (Stopped, Prepared) => TransitionCallback::StoppedToPrepared,
            (Prepared, Playing) => TransitionCallback::PreparedToPlaying,
            (Playing, Prepared) => TransitionCallback::PlayingToPrepared,
            (Prepared, Stopped) => TransitionCallback::PreparedToStopped,
            _ => unreachable!("only adjacent transitions are constructed"),
        }
    }
}

/// Drives an element's playback state one adjacent step at a time, queuing
/// intermediate targets when asked to skip (spec §4.5 "skipping a state
/// queues intermediate transitions").
pub struct ElementStateMachine {
    current: PlaybackState,
    pending_targets: VecDeque<PlaybackState>,
}

impl ElementStateMachine {
    pub fn new() -> Self {
        Self {
            current: PlaybackState::Stopped,
            pending_targets: VecDeque::new(),
        }
    }

    pub fn current(&self) -> PlaybackState {
        self.current
    }

    /// Requests a transition to `target`. Idempotent: requesting the
    /// current state is a no-op (spec §8 "Idempotence"). Returns the
    /// ordered list of adjacent-step callbacks to invoke; the caller
    /// advances `self` one step at a time via [`Self::advance`] after each
    /// callback completes and reports back to the parent.
    pub fn request(&mut self, target: PlaybackState) -> Option<TransitionCallback> {
        if target == self.current && self.pending_targets.is_empty() {
            return None;
        }
        self.pending_targets.push_back(target);
        self.next_step()
    }

    /// Computes (without mutating `current`) the next adjacent-step
    /// callback toward the front of the pending queue, if any.
    fn next_step(&mut self) -> Option<TransitionCallback> {
        while let Some(&target) = self.pending_targets.front() {
            match self.current.step_toward(target) {
                Some(next) => return Some(TransitionCallback::between(self.current, next)),
                None => {
                    self.pending_targets.pop_front();
                }
            }
        }
        None
    }

    /// Commits the state reached by the callback just invoked, and returns
    /// the next callback to run, if the walk isn't finished.
    pub fn advance(&mut self, completed: TransitionCallback) -> Option<TransitionCallback> {
        self.current = match completed {
            TransitionCallback::StoppedToPrepared => PlaybackState::Prepared,
            TransitionCallback::PreparedToPlaying => PlaybackState::Playing,
            TransitionCallback::PlayingToPrepared => PlaybackState::Prepared,
            TransitionCallback::PreparedToStopped => PlaybackState::Stopped,
        };
        self.next_step()
    }
}

impl Default for ElementStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
