//! Exercise sessions: one detector bound to one capped counter and a sink.
//!
//! A session is the unit a driver talks to. The driver pushes raw samples or
//! pose frames, and the session decides whether a repetition happened,
//! advances its `RepetitionCount` and forwards the new count to its
//! `ProgressSink`. There is at most one sink call per repetition.
//!
//! Sessions own their detector state exclusively. Two sessions of the same
//! exercise never interfere, which is what allows several trackers to run
//! side by side.

use crate::angle_threshold::{AngleThresholdConfig, AngleThresholdDetector};
use crate::error::ConfigError;
use crate::motion_spike::{MotionSpikeConfig, MotionSpikeDetector};
use crate::progress::{LoggingSink, ProgressSink, RepetitionCount};
use crate::types::{AccelerationSample, Exercise, PoseFrame, RepetitionEvent};

/// Default repetition goal per exercise.
pub const DEFAULT_CAP: u32 = 100;

/// The detector backing a session.
#[derive(Debug, Clone)]
pub enum SessionDetector {
    Motion(MotionSpikeDetector),
    Angle(AngleThresholdDetector),
}

/// A single exercise being tracked.
pub struct ExerciseSession<S: ProgressSink = LoggingSink> {
    exercise: Exercise,
    detector: SessionDetector,
    count: RepetitionCount,
    sink: S,
    goal_signalled: bool,
}

impl ExerciseSession<LoggingSink> {
    /// Push-up session with default thresholds, reporting through the log.
    pub fn default_pushups() -> Self {
        Self::with_detector(
            Exercise::Pushups,
            SessionDetector::Motion(MotionSpikeDetector::with_defaults()),
            DEFAULT_CAP,
            LoggingSink::new(),
        )
    }

    /// Squat session with default thresholds, reporting through the log.
    pub fn default_squats() -> Self {
        Self::with_detector(
            Exercise::Squats,
            SessionDetector::Angle(AngleThresholdDetector::with_defaults()),
            DEFAULT_CAP,
            LoggingSink::new(),
        )
    }
}

impl<S: ProgressSink> ExerciseSession<S> {
    /// Push-up session counted from motion spikes.
    pub fn pushups(config: MotionSpikeConfig, cap: u32, sink: S) -> Result<Self, ConfigError> {
        let detector = MotionSpikeDetector::new(config)?;
        Ok(Self::with_detector(
            Exercise::Pushups,
            SessionDetector::Motion(detector),
            cap,
            sink,
        ))
    }

    /// Squat session counted from knee angle.
    pub fn squats(config: AngleThresholdConfig, cap: u32, sink: S) -> Result<Self, ConfigError> {
        let detector = AngleThresholdDetector::new(config)?;
        Ok(Self::with_detector(
            Exercise::Squats,
            SessionDetector::Angle(detector),
            cap,
            sink,
        ))
    }

    fn with_detector(exercise: Exercise, detector: SessionDetector, cap: u32, sink: S) -> Self {
        Self {
            exercise,
            detector,
            count: RepetitionCount::new(exercise.label(), cap),
            sink,
            goal_signalled: false,
        }
    }

    /// Feed one acceleration sample.
    pub fn push_motion(&mut self, sample: &AccelerationSample, now_ms: u64) -> Option<RepetitionEvent> {
        self.push_motion_optional(Some(sample), now_ms)
    }

    /// Feed one motion event, which may carry no acceleration data.
    pub fn push_motion_optional(
        &mut self,
        sample: Option<&AccelerationSample>,
        now_ms: u64,
    ) -> Option<RepetitionEvent> {
        let fired = match &mut self.detector {
            SessionDetector::Motion(detector) => detector.observe_optional(sample, now_ms),
            SessionDetector::Angle(_) => {
                log::debug!("{} session ignores motion samples", self.exercise);
                return None;
            }
        };
        fired.then(|| self.on_repetition(now_ms))
    }

    /// Feed one pose frame.
    pub fn push_pose(&mut self, frame: &PoseFrame, now_ms: u64) -> Option<RepetitionEvent> {
        let fired = match &mut self.detector {
            SessionDetector::Angle(detector) => detector.observe_frame(frame),
            SessionDetector::Motion(_) => {
                log::debug!("{} session ignores pose frames", self.exercise);
                return None;
            }
        };
        fired.then(|| self.on_repetition(now_ms))
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn count(&self) -> &RepetitionCount {
        &self.count
    }

    pub fn detector(&self) -> &SessionDetector {
        &self.detector
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ends the session, handing back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    // =========================================================================
    // PRIVATE METHODS
    // =========================================================================

    fn on_repetition(&mut self, now_ms: u64) -> RepetitionEvent {
        let count = self.count.increment();
        self.sink.record(self.exercise.label(), count, self.count.cap());

        // Latched like the sink's goal cue: the first repetition recorded at
        // the cap reaches the goal, including when the cap is zero
        let goal_reached = self.count.is_complete() && !self.goal_signalled;
        if goal_reached {
            self.goal_signalled = true;
        }

        let event = RepetitionEvent {
            exercise: self.exercise,
            count,
            timestamp_ms: now_ms,
            goal_reached,
        };
        log::info!(
            "{} repetition at {}ms ({}/{})",
            self.exercise,
            now_ms,
            count,
            self.count.cap()
        );
        event
    }
}

// ============================================================================
// TESTS
// ============================================================================
