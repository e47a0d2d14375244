//! Forward-only keystroke judging.
//!
//! [`judge`] is a pure reducer: it takes the previous [`InputState`], the
//! target text and the whole proposed input (not a delta), and either returns
//! the next state or says why the edit was refused. A refused edit leaves the
//! caller's state untouched.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Why a proposed input was not applied
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// shorter than what was already typed
    Shrink,
    /// would run past the end of the target text
    Overflow,
    /// rewrites characters that were already judged
    Rewrite,
    /// identical to the current input
    Unchanged,
    /// the task is finished; nothing more is accepted
    Complete,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Accepted(InputState),
    Rejected(Rejection),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub typed: String,
    pub correct: u32,
    pub wrong: u32,
    pub started_at: Option<Instant>,
    pub elapsed: Duration,
    typed_len: usize,
    target_len: usize,
}

impl InputState {
    /// Fresh state for a target of `text`
    pub fn new(text: &str) -> Self {
        Self {
            target_len: text.chars().count(),
            ..Self::default()
        }
    }

    pub fn typed_len(&self) -> usize {
        self.typed_len
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.typed_len == self.target_len
    }

    pub fn in_progress(&self) -> bool {
        self.has_started() && !self.is_complete()
    }

    /// Per-char outcome of what has been typed so far
    pub fn outcomes<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Outcome> + 'a {
        self.typed.chars().zip(text.chars()).map(|(given, expected)| {
            if given == expected {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        })
    }

    /// Advance the timer. Frozen once the task is complete.
    pub fn tick(&mut self, now: Instant) {
        if !self.in_progress() {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.elapsed = now.saturating_duration_since(started_at);
        }
    }
}

/// Judge a proposed input against `text`.
pub fn judge(state: &InputState, text: &str, proposed: &str, now: Instant) -> Transition {
    if state.is_complete() {
        return Transition::Rejected(Rejection::Complete);
    }

    let proposed_len = proposed.chars().count();
    if proposed_len < state.typed_len {
        return Transition::Rejected(Rejection::Shrink);
    }
    if proposed_len > state.target_len {
        return Transition::Rejected(Rejection::Overflow);
    }
    if !proposed.starts_with(state.typed.as_str()) {
        return Transition::Rejected(Rejection::Rewrite);
    }
    if proposed_len == state.typed_len {
        return Transition::Rejected(Rejection::Unchanged);
    }

    let mut next = state.clone();
    if next.started_at.is_none() {
        next.started_at = Some(now);
    }

    let appended = &proposed[state.typed.len()..];
    let expected = text.chars().skip(state.typed_len);
    for (given, expected) in appended.chars().zip(expected) {
        if given == expected {
            next.correct += 1;
        } else {
            next.wrong += 1;
        }
        next.typed.push(given);
        next.typed_len += 1;
    }

    if next.is_complete() {
        if let Some(started_at) = next.started_at {
            next.elapsed = now.saturating_duration_since(started_at);
        }
    }

    Transition::Accepted(next)
}
