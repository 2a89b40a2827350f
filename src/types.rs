//! Core data types for the repetition counting engine.
//!
//! This module defines the inputs the detectors consume (acceleration samples,
//! pose keypoints) and the outputs they produce (repetition events). Nothing
//! here holds detector state; state lives with each detector instance.
//!
//! Design principle: if a concept exists, it gets a type. Joints are an enum,
//! not string labels, and exercises are an enum, not `"pushups"` literals
//! scattered across call sites.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// MOTION INPUT
// ============================================================================

/// A single 3-axis acceleration reading (gravity included) in m/s².
///
/// Transient: produced per motion event and never retained by the detectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelerationSample {
    /// Creates a new acceleration sample.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean magnitude of the acceleration vector.
    pub fn magnitude(&self) -> f32 {
        let x2 = self.x * self.x;
        let y2 = self.y * self.y;
        let z2 = self.z * self.z;
        (x2 + y2 + z2).sqrt()
    }

    /// A sample is well-formed when every axis carries a finite value.
    ///
    /// Sensors occasionally report NaN on the first event after a permission
    /// grant; those samples carry no information.
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ============================================================================
// POSE INPUT
// ============================================================================

/// A single 2-D pose keypoint with the estimator's confidence in it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    /// Horizontal image coordinate.
    pub x: f32,
    /// Vertical image coordinate (grows downwards in image space).
    pub y: f32,
    /// Estimator confidence in [0.0, 1.0].
    #[serde(alias = "score")]
    pub confidence: f32,
}

impl Keypoint {
    /// Creates a new keypoint.
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// True when the keypoint is strictly more confident than `floor`.
    pub fn is_confident(&self, floor: f32) -> bool {
        self.confidence > floor
    }
}

/// Labelled joints a pose estimator reports.
///
/// Only the lower-body triples feed the squat detector; the rest are accepted
/// so whole frames can be passed through without filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Snake-case name the pose estimator reports for this joint.
    pub fn name(&self) -> &'static str {
        match self {
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
        }
    }

    /// Maps an estimator keypoint name to a joint.
    ///
    /// Returns None for keypoints this engine does not track (nose, eyes,
    /// ears, heels, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left_shoulder" => Some(Joint::LeftShoulder),
            "right_shoulder" => Some(Joint::RightShoulder),
            "left_elbow" => Some(Joint::LeftElbow),
            "right_elbow" => Some(Joint::RightElbow),
            "left_wrist" => Some(Joint::LeftWrist),
            "right_wrist" => Some(Joint::RightWrist),
            "left_hip" => Some(Joint::LeftHip),
            "right_hip" => Some(Joint::RightHip),
            "left_knee" => Some(Joint::LeftKnee),
            "right_knee" => Some(Joint::RightKnee),
            "left_ankle" => Some(Joint::LeftAnkle),
            "right_ankle" => Some(Joint::RightAnkle),
            _ => None,
        }
    }
}

/// Which side of the body a joint triple is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// The (hip, knee, ankle) joints on this side.
    pub fn leg(&self) -> JointTriple {
        match self {
            Side::Left => JointTriple::new(Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle),
            Side::Right => JointTriple::new(Joint::RightHip, Joint::RightKnee, Joint::RightAnkle),
        }
    }
}

/// Three joints whose middle one is the vertex of the measured angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriple {
    pub proximal: Joint,
    pub vertex: Joint,
    pub distal: Joint,
}

impl JointTriple {
    pub fn new(proximal: Joint, vertex: Joint, distal: Joint) -> Self {
        Self {
            proximal,
            vertex,
            distal,
        }
    }
}

/// All keypoints reported for one video frame.
///
/// On the wire a frame is a map from keypoint name to keypoint. Names that
/// do not correspond to a tracked `Joint` are dropped while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Keypoint>", into = "HashMap<String, Keypoint>")]
pub struct PoseFrame {
    keypoints: HashMap<Joint, Keypoint>,
}

impl From<HashMap<String, Keypoint>> for PoseFrame {
    fn from(raw: HashMap<String, Keypoint>) -> Self {
        let keypoints = raw
            .into_iter()
            .filter_map(|(name, keypoint)| Joint::from_name(&name).map(|joint| (joint, keypoint)))
            .collect();
        Self { keypoints }
    }
}

impl From<PoseFrame> for HashMap<String, Keypoint> {
    fn from(frame: PoseFrame) -> Self {
        frame
            .keypoints
            .into_iter()
            .map(|(joint, keypoint)| (joint.name().to_string(), keypoint))
            .collect()
    }
}

impl PoseFrame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, joint: Joint, keypoint: Keypoint) -> Self {
        self.keypoints.insert(joint, keypoint);
        self
    }

    /// Sets (or replaces) the keypoint for a joint.
    pub fn insert(&mut self, joint: Joint, keypoint: Keypoint) {
        self.keypoints.insert(joint, keypoint);
    }

    /// Keypoint for a joint, if the estimator reported one.
    pub fn get(&self, joint: Joint) -> Option<&Keypoint> {
        self.keypoints.get(&joint)
    }

    /// Resolves a triple into its three keypoints.
    ///
    /// Returns None if any of the three joints is missing.
    pub fn triple(&self, joints: JointTriple) -> Option<(Keypoint, Keypoint, Keypoint)> {
        Some((
            *self.get(joints.proximal)?,
            *self.get(joints.vertex)?,
            *self.get(joints.distal)?,
        ))
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

// ============================================================================
// DETECTOR STATE & OUTPUT
// ============================================================================

/// Phase of an angle-threshold movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementPhase {
    /// Standing / extended. A repetition is armed.
    #[default]
    Up,
    /// Bottom of the movement. Must return above the up threshold to re-arm.
    Down,
}

/// The exercises the engine counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    Pushups,
    Squats,
}

impl Exercise {
    /// Label used by progress sinks.
    pub fn label(&self) -> &'static str {
        match self {
            Exercise::Pushups => "pushups",
            Exercise::Squats => "squats",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected repetition, after the progress counter has been updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionEvent {
    /// Which exercise produced the repetition.
    pub exercise: Exercise,
    /// Clamped count after this repetition.
    pub count: u32,
    /// Driver timestamp of the sample that fired.
    pub timestamp_ms: u64,
    /// True only for the repetition that first brought the count to its cap.
    pub goal_reached: bool,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        let sample = AccelerationSample::new(3.0, 4.0, 12.0);
        assert!((sample.magnitude() - 13.0).abs() < 1e-5);
    }

    #[test]
    fn test_well_formed() {
        assert!(AccelerationSample::new(0.0, 9.81, 0.0).is_well_formed());
        assert!(!AccelerationSample::new(f32::NAN, 0.0, 0.0).is_well_formed());
        assert!(!AccelerationSample::new(0.0, f32::INFINITY, 0.0).is_well_formed());
    }

    #[test]
    fn test_keypoint_confidence_is_strict() {
        let kp = Keypoint::new(0.0, 0.0, 0.5);
        assert!(!kp.is_confident(0.5));
        assert!(Keypoint::new(0.0, 0.0, 0.51).is_confident(0.5));
    }

    #[test]
    fn test_frame_triple_requires_all_joints() {
        let frame = PoseFrame::new()
            .with(Joint::LeftHip, Keypoint::new(0.0, 0.0, 1.0))
            .with(Joint::LeftKnee, Keypoint::new(1.0, 0.0, 1.0));
        assert!(frame.triple(Side::Left.leg()).is_none());

        let frame = frame.with(Joint::LeftAnkle, Keypoint::new(1.0, 1.0, 1.0));
        let (hip, knee, ankle) = frame.triple(Side::Left.leg()).unwrap();
        assert_eq!(hip.x, 0.0);
        assert_eq!(knee.x, 1.0);
        assert_eq!(ankle.y, 1.0);
    }

    #[test]
    fn test_frame_deserializes_snake_case_joints() {
        let json = r#"{"left_hip":{"x":1.0,"y":2.0,"confidence":0.9},"right_knee":{"x":0.0,"y":0.0,"score":0.2}}"#;
        let frame: PoseFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(Joint::LeftHip).unwrap().y, 2.0);
        assert_eq!(frame.get(Joint::RightKnee).unwrap().confidence, 0.2);
    }

    #[test]
    fn test_frame_drops_untracked_keypoints() {
        let json = r#"{"nose":{"x":0.5,"y":0.1,"confidence":0.99},"left_eye":{"x":0.4,"y":0.1,"confidence":0.9},"left_knee":{"x":1.0,"y":0.0,"confidence":0.8}}"#;
        let frame: PoseFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.get(Joint::LeftKnee).unwrap().confidence, 0.8);
    }

    #[test]
    fn test_joint_names_match_serde_names() {
        let joints = [
            Joint::LeftShoulder,
            Joint::RightShoulder,
            Joint::LeftElbow,
            Joint::RightElbow,
            Joint::LeftWrist,
            Joint::RightWrist,
            Joint::LeftHip,
            Joint::RightHip,
            Joint::LeftKnee,
            Joint::RightKnee,
            Joint::LeftAnkle,
            Joint::RightAnkle,
        ];
        for joint in joints {
            let serialized = serde_json::to_string(&joint).unwrap();
            assert_eq!(serialized, format!("\"{}\"", joint.name()));
            assert_eq!(Joint::from_name(joint.name()), Some(joint));
        }
        assert_eq!(Joint::from_name("nose"), None);
    }

    #[test]
    fn test_frame_serializes_by_joint_name() {
        let frame = PoseFrame::new().with(Joint::RightAnkle, Keypoint::new(1.0, 2.0, 0.7));
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"right_ankle\""));
        let back: PoseFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_exercise_labels() {
        assert_eq!(Exercise::Pushups.label(), "pushups");
        assert_eq!(Exercise::Squats.to_string(), "squats");
    }

    #[test]
    fn test_default_phase_is_up() {
        assert_eq!(MovementPhase::default(), MovementPhase::Up);
    }
}
