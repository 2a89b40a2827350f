//! Rep Sensing Library
//!
//! Counts exercise repetitions from raw sensor streams:
//!
//! - **Push-ups** from 3-axis acceleration spikes with a cooldown
//!   ([`MotionSpikeDetector`]).
//! - **Squats** from pose keypoints, using a knee-angle state machine with
//!   hysteresis ([`AngleThresholdDetector`]).
//!
//! # Design Philosophy
//!
//! - **Explicit state**: every detector owns its state; there are no globals,
//!   so independent trackers can run side by side.
//! - **Absorb bad input**: missing data, low-confidence keypoints and
//!   malformed samples are no-ops, never errors.
//! - **O(1) per sample**: no buffers, no allocation on the hot path, no
//!   blocking inside a detector call.
//!
//! # Example
//!
//! ```
//! use rep_sensing::{AccelerationSample, ExerciseSession};
//!
//! let mut session = ExerciseSession::default_pushups();
//! let spike = AccelerationSample::new(0.0, 20.0, 0.0);
//!
//! assert!(session.push_motion(&spike, 0).is_some());
//! assert!(session.push_motion(&spike, 300).is_none()); // still cooling down
//! assert_eq!(session.count().count(), 1);
//! ```

pub mod angle_threshold;
pub mod angles;
pub mod config;
pub mod error;
pub mod motion_spike;
pub mod progress;
pub mod replay;
pub mod session;
pub mod types;


// Re-export commonly used types
pub use angle_threshold::{AngleThresholdConfig, AngleThresholdDetector};
pub use config::TrackerConfig;
pub use error::{ConfigError, ReplayError};
pub use motion_spike::{MotionSpikeConfig, MotionSpikeDetector};
pub use progress::{LoggingSink, ProgressSink, RecordingSink, RepetitionCount};
pub use replay::{Replay, ReplayRecord, ReplaySummary};
pub use session::ExerciseSession;
pub use types::{
    AccelerationSample, Exercise, Joint, Keypoint, MovementPhase, PoseFrame, RepetitionEvent, Side,
};
