//! Progress counting and reporting.
//!
//! `RepetitionCount` is the capped counter a session increments on every
//! detector firing. `ProgressSink` is the outward-facing consumer of those
//! counts (a page element, a log, a test recorder). Sinks clamp what they
//! receive, ignore repeats, and raise the goal-reached cue exactly once per
//! label.

use std::collections::HashMap;

/// A capped, monotonically non-decreasing repetition counter.
///
/// Invariant: `0 <= count <= cap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionCount {
    label: String,
    count: u32,
    cap: u32,
}

impl RepetitionCount {
    pub fn new(label: impl Into<String>, cap: u32) -> Self {
        Self {
            label: label.into(),
            count: 0,
            cap,
        }
    }

    /// Adds one repetition, saturating at the cap. Returns the new count.
    pub fn increment(&mut self) -> u32 {
        if self.count < self.cap {
            self.count += 1;
        } else {
            log::info!("Max progress reached for \"{}\"", self.label);
        }
        self.count
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// True once the count has reached its cap.
    pub fn is_complete(&self) -> bool {
        self.count >= self.cap
    }

    /// Fraction of the goal completed, in [0.0, 1.0].
    pub fn fraction(&self) -> f32 {
        if self.cap == 0 {
            return 1.0;
        }
        self.count as f32 / self.cap as f32
    }
}

/// Consumer of (label, count, cap) updates.
pub trait ProgressSink {
    /// Record a new count for `label`. Implementations clamp to `cap`.
    fn record(&mut self, label: &str, new_count: u32, cap: u32);
}

/// A change a sink should act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub label: String,
    pub count: u32,
    pub cap: u32,
    /// True only for the update that first brought `count` to `cap`.
    pub goal_reached: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct LabelState {
    count: Option<u32>,
    goal_signalled: bool,
}

/// Per-label bookkeeping shared by the sinks: clamping, dropping repeats and
/// latching the goal cue.
#[derive(Debug, Default)]
pub struct ProgressBoard {
    labels: HashMap<String, LabelState>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a record call. Returns None when nothing changed.
    pub fn apply(&mut self, label: &str, new_count: u32, cap: u32) -> Option<ProgressUpdate> {
        let clamped = new_count.min(cap);
        let state = self.labels.entry(label.to_string()).or_default();

        if state.count == Some(clamped) {
            return None;
        }
        state.count = Some(clamped);

        let goal_reached = clamped == cap && !state.goal_signalled;
        if goal_reached {
            state.goal_signalled = true;
        }

        Some(ProgressUpdate {
            label: label.to_string(),
            count: clamped,
            cap,
            goal_reached,
        })
    }

    /// Last clamped count recorded for a label.
    pub fn count(&self, label: &str) -> Option<u32> {
        self.labels.get(label).and_then(|state| state.count)
    }

    /// Whether the goal cue has been raised for a label.
    pub fn goal_signalled(&self, label: &str) -> bool {
        self.labels
            .get(label)
            .map(|state| state.goal_signalled)
            .unwrap_or(false)
    }
}

/// Sink that reports progress through the `log` facade.
#[derive(Debug, Default)]
pub struct LoggingSink {
    board: ProgressBoard,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &ProgressBoard {
        &self.board
    }
}

impl ProgressSink for LoggingSink {
    fn record(&mut self, label: &str, new_count: u32, cap: u32) {
        if let Some(update) = self.board.apply(label, new_count, cap) {
            log::info!("{}: {}/{}", update.label, update.count, update.cap);
            if update.goal_reached {
                log::info!("Goal reached for \"{}\"", update.label);
            }
        }
    }
}

/// Sink that keeps every effective update, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    board: ProgressBoard,
    updates: Vec<ProgressUpdate>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[ProgressUpdate] {
        &self.updates
    }

    /// Number of goal cues raised across all labels.
    pub fn goal_cues(&self) -> usize {
        self.updates.iter().filter(|u| u.goal_reached).count()
    }

    pub fn count(&self, label: &str) -> Option<u32> {
        self.board.count(label)
    }
}

impl ProgressSink for RecordingSink {
    fn record(&mut self, label: &str, new_count: u32, cap: u32) {
        if let Some(update) = self.board.apply(label, new_count, cap) {
            self.updates.push(update);
        }
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn record(&mut self, label: &str, new_count: u32, cap: u32) {
        (**self).record(label, new_count, cap);
    }
}

// ============================================================================
// TESTS
// ============================================================================
