//! Motion-Spike Detection Module.
//!
//! Counts push-ups from device-motion acceleration. A repetition is a spike
//! in total acceleration magnitude (gravity included) above a fixed
//! threshold. A cooldown after each spike keeps the bounce of a single
//! push-up from being counted twice.
//!
//! The detector holds only the timestamp of its last firing. Every call is
//! O(1) and never blocks.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::AccelerationSample;

/// Configuration for motion-spike detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSpikeConfig {
    /// Magnitude (m/s²) that must be strictly exceeded to count a spike.
    /// Higher means more movement is needed.
    pub threshold: f32,
    /// Minimum time between two firings in milliseconds (prevents double-counting).
    pub cooldown_ms: u64,
}

impl Default for MotionSpikeConfig {
    fn default() -> Self {
        Self {
            threshold: 15.0,  // ~1.5 g with gravity included
            cooldown_ms: 500, // Max 2 reps/sec
        }
    }
}

impl MotionSpikeConfig {
    /// Checks that the threshold is a usable magnitude.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "motion threshold must be a finite non-negative magnitude, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Push-up detector driven by acceleration magnitude spikes.
#[derive(Debug, Clone)]
pub struct MotionSpikeDetector {
    config: MotionSpikeConfig,

    // Timestamp of the last firing; None until the first repetition
    last_event_ms: Option<u64>,

    // Diagnostics
    last_magnitude: Option<f32>,
    total_fired: u64,
}

impl MotionSpikeDetector {
    /// Create a new detector, rejecting thresholds no magnitude can exceed.
    pub fn new(config: MotionSpikeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::unchecked(config))
    }

    /// Create a detector with the default threshold and cooldown.
    pub fn with_defaults() -> Self {
        Self::unchecked(MotionSpikeConfig::default())
    }

    fn unchecked(config: MotionSpikeConfig) -> Self {
        Self {
            config,
            last_event_ms: None,
            last_magnitude: None,
            total_fired: 0,
        }
    }

    /// Observe one acceleration sample taken at `now_ms`.
    ///
    /// Returns true if this sample completes a repetition. Malformed samples
    /// (any non-finite axis) are ignored and leave the state unchanged.
    pub fn observe(&mut self, sample: &AccelerationSample, now_ms: u64) -> bool {
        if !sample.is_well_formed() {
            log::debug!("Ignoring malformed acceleration sample at {}ms", now_ms);
            return false;
        }

        let magnitude = sample.magnitude();
        self.last_magnitude = Some(magnitude);
        log::trace!(
            "Acceleration: x={}, y={}, z={} total={}",
            sample.x,
            sample.y,
            sample.z,
            magnitude
        );

        let above_threshold = magnitude > self.config.threshold;
        if !above_threshold || !self.cooldown_elapsed(now_ms) {
            return false;
        }

        self.last_event_ms = Some(now_ms);
        self.total_fired += 1;
        log::debug!("Motion spike {:.2} at {}ms", magnitude, now_ms);
        true
    }

    /// Observe a motion event that may carry no acceleration data.
    ///
    /// Some platforms deliver motion events before the accelerometer is ready;
    /// those are absorbed here.
    pub fn observe_optional(&mut self, sample: Option<&AccelerationSample>, now_ms: u64) -> bool {
        match sample {
            Some(sample) => self.observe(sample, now_ms),
            None => {
                log::warn!("Acceleration data is unavailable at {}ms", now_ms);
                false
            }
        }
    }

    /// Observe a batch of timestamped samples and return how many fired.
    pub fn observe_batch(&mut self, samples: &[(u64, AccelerationSample)]) -> usize {
        samples
            .iter()
            .filter(|(t, sample)| self.observe(sample, *t))
            .count()
    }

    /// Timestamp of the last firing, if any.
    pub fn last_event_ms(&self) -> Option<u64> {
        self.last_event_ms
    }

    /// Magnitude of the last well-formed sample seen.
    pub fn last_magnitude(&self) -> Option<f32> {
        self.last_magnitude
    }

    /// Total number of spikes this detector has fired.
    pub fn total_fired(&self) -> u64 {
        self.total_fired
    }

    pub fn config(&self) -> &MotionSpikeConfig {
        &self.config
    }

    /// Forget the last firing so the next spike counts immediately.
    pub fn reset(&mut self) {
        self.last_event_ms = None;
        self.last_magnitude = None;
    }

    // =========================================================================
    // PRIVATE METHODS
    // =========================================================================

    fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        match self.last_event_ms {
            None => true,
            // A clock that runs backwards yields zero elapsed time
            Some(last) => now_ms.saturating_sub(last) > self.config.cooldown_ms,
        }
    }
}

impl Default for MotionSpikeDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
