//! Angle-Threshold Detection Module.
//!
//! Counts squats from pose keypoints. Each frame's hip, knee and ankle are
//! reduced to a knee angle, which drives a two-state machine:
//!
//! - Up → Down when the angle drops below `down_threshold_deg`; this is the
//!   transition that counts a repetition.
//! - Down → Up when the angle rises above `up_threshold_deg`; this only
//!   re-arms the detector.
//!
//! The gap between the two thresholds is the hysteresis band. An angle
//! jittering around a single threshold can cross it at most once per cycle.
//!
//! Frames whose keypoints are not confident enough carry no information.
//! They leave the state untouched rather than being read as "no motion".

use serde::{Deserialize, Serialize};

use crate::angles::knee_angle;
use crate::error::ConfigError;
use crate::types::{Keypoint, MovementPhase, PoseFrame, Side};

/// Configuration for angle-threshold detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleThresholdConfig {
    /// Angle (degrees) below which the movement counts as down.
    pub down_threshold_deg: f32,
    /// Angle (degrees) above which the movement counts as back up.
    pub up_threshold_deg: f32,
    /// Every keypoint must be strictly more confident than this.
    pub min_confidence: f32,
    /// Which leg to read from a pose frame.
    pub side: Side,
}

impl Default for AngleThresholdConfig {
    fn default() -> Self {
        Self {
            down_threshold_deg: 70.0,
            up_threshold_deg: 110.0,
            min_confidence: 0.5,
            side: Side::Left,
        }
    }
}

impl AngleThresholdConfig {
    /// Shallower squats: counts once the knee passes 90°.
    pub fn knee_down_90() -> Self {
        Self {
            down_threshold_deg: 90.0,
            up_threshold_deg: 120.0,
            ..Default::default()
        }
    }

    /// Checks that the thresholds form a real hysteresis band and the
    /// confidence floor is a probability.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.down_threshold_deg.is_finite() || !self.up_threshold_deg.is_finite() {
            return Err(ConfigError::Invalid(
                "angle thresholds must be finite".to_string(),
            ));
        }
        if self.down_threshold_deg >= self.up_threshold_deg {
            return Err(ConfigError::Invalid(format!(
                "down threshold ({}°) must be below up threshold ({}°)",
                self.down_threshold_deg, self.up_threshold_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "minimum confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// Squat detector driven by knee angle with hysteresis.
#[derive(Debug, Clone)]
pub struct AngleThresholdDetector {
    config: AngleThresholdConfig,

    phase: MovementPhase,
    last_angle: Option<f32>,

    // Statistics
    total_fired: u64,
    skipped_frames: u64,
}

impl AngleThresholdDetector {
    /// Create a new detector, rejecting configurations without a hysteresis band.
    pub fn new(config: AngleThresholdConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: MovementPhase::Up,
            last_angle: None,
            total_fired: 0,
            skipped_frames: 0,
        })
    }

    /// Create a detector with the default 70°/110° band.
    pub fn with_defaults() -> Self {
        Self {
            config: AngleThresholdConfig::default(),
            phase: MovementPhase::Up,
            last_angle: None,
            total_fired: 0,
            skipped_frames: 0,
        }
    }

    /// Observe one frame's hip, knee and ankle.
    ///
    /// Returns true if this frame completes a repetition.
    pub fn observe(&mut self, hip: &Keypoint, knee: &Keypoint, ankle: &Keypoint) -> bool {
        let floor = self.config.min_confidence;
        if !(hip.is_confident(floor) && knee.is_confident(floor) && ankle.is_confident(floor)) {
            self.skipped_frames += 1;
            return false;
        }

        self.observe_angle(knee_angle(hip, knee, ankle))
    }

    /// Observe a whole pose frame, reading the configured leg.
    ///
    /// A frame missing any of the three joints is treated like a
    /// low-confidence frame.
    pub fn observe_frame(&mut self, frame: &PoseFrame) -> bool {
        match frame.triple(self.config.side.leg()) {
            Some((hip, knee, ankle)) => self.observe(&hip, &knee, &ankle),
            None => {
                self.skipped_frames += 1;
                false
            }
        }
    }

    /// Drive the state machine with an already computed, trusted angle.
    pub fn observe_angle(&mut self, angle_deg: f32) -> bool {
        if !angle_deg.is_finite() {
            self.skipped_frames += 1;
            return false;
        }

        self.last_angle = Some(angle_deg);
        log::trace!("Knee angle: {:.1}°", angle_deg);

        match self.phase {
            MovementPhase::Up if angle_deg < self.config.down_threshold_deg => {
                self.phase = MovementPhase::Down;
                self.total_fired += 1;
                log::debug!("Squat down at {:.1}°", angle_deg);
                true
            }
            MovementPhase::Down if angle_deg > self.config.up_threshold_deg => {
                self.phase = MovementPhase::Up;
                log::debug!("Squat up at {:.1}°", angle_deg);
                false
            }
            _ => false,
        }
    }

    /// Current movement phase.
    pub fn phase(&self) -> MovementPhase {
        self.phase
    }

    /// Angle from the last trusted frame.
    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    /// Total repetitions fired.
    pub fn total_fired(&self) -> u64 {
        self.total_fired
    }

    /// Frames dropped for low confidence, missing joints or degenerate angles.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    pub fn config(&self) -> &AngleThresholdConfig {
        &self.config
    }

    /// Return to the Up phase.
    pub fn reset(&mut self) {
        self.phase = MovementPhase::Up;
        self.last_angle = None;
    }
}

impl Default for AngleThresholdDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
