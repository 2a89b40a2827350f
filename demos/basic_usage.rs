/// Basic usage example: feed motion samples and pose frames, get repetitions
use rep_sensing::{
    AccelerationSample, ExerciseSession, Joint, Keypoint, PoseFrame, RepetitionEvent,
};

fn main() {
    println!("=== Rep Sensing: Basic Example ===\n");

    // Push-ups: default threshold 15 m/s², cooldown 500ms
    let mut pushups = ExerciseSession::default_pushups();

    let motion_samples = vec![
        // Resting on the back, gravity only
        (0, [0.1, 0.2, 9.81]),
        (16, [0.1, 0.1, 9.79]),
        // First push-up: spike, then the bounce inside the cooldown
        (200, [1.2, 3.4, 19.6]),
        (216, [0.8, 2.1, 17.2]),
        (480, [0.4, 1.0, 16.1]),
        // Back to rest
        (600, [0.1, 0.2, 9.80]),
        // Second push-up
        (1300, [1.0, 2.9, 18.8]),
    ];

    println!("Processing {} motion samples...", motion_samples.len());
    for (t, [x, y, z]) in motion_samples {
        if let Some(event) = pushups.push_motion(&AccelerationSample::new(x, y, z), t) {
            print_event(&event);
        }
    }

    // Squats: knee angle below 70° counts, above 110° re-arms
    let mut squats = ExerciseSession::default_squats();
    let angles = [165.0f32, 120.0, 85.0, 62.0, 58.0, 75.0, 118.0, 160.0, 64.0];

    println!("\nProcessing {} pose frames...", angles.len());
    for (i, angle) in angles.iter().enumerate() {
        if let Some(event) = squats.push_pose(&leg_frame(*angle), i as u64 * 33) {
            print_event(&event);
        }
    }

    println!("\n=== Summary ===");
    println!("Push-ups: {}/{}", pushups.count().count(), pushups.count().cap());
    println!("Squats: {}/{}", squats.count().count(), squats.count().cap());
}

/// Left leg keypoints bent to `angle_deg` at the knee.
fn leg_frame(angle_deg: f32) -> PoseFrame {
    let shin = -angle_deg.to_radians();
    PoseFrame::new()
        .with(Joint::LeftHip, Keypoint::new(0.0, 0.0, 0.95))
        .with(Joint::LeftKnee, Keypoint::new(1.0, 0.0, 0.95))
        .with(Joint::LeftAnkle, Keypoint::new(1.0 + shin.cos(), shin.sin(), 0.95))
}

fn print_event(event: &RepetitionEvent) {
    println!(
        "  {} #{} at {}ms{}",
        event.exercise,
        event.count,
        event.timestamp_ms,
        if event.goal_reached { " (goal reached!)" } else { "" }
    );
}
