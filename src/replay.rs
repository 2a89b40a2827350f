//! Replay driver for recorded sensor streams.
//!
//! Reads JSON lines, one record per motion event or video frame, and pushes
//! them one at a time through a push-up session and a squat session:
//!
//! ```text
//! {"kind":"motion","t":1200,"x":0.4,"y":18.9,"z":3.1}
//! {"kind":"motion","t":1216,"x":null,"y":null,"z":null}
//! {"kind":"pose","t":1233,"keypoints":{"left_hip":{"x":0.4,"y":0.5,"confidence":0.9}}}
//! ```
//!
//! Unreadable lines are skipped with a warning. Only an I/O failure on the
//! reader ends a replay early. Cancellation is cooperative: the stop flag is
//! checked between records and never inside a detector call.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::config::TrackerConfig;
use crate::error::{ConfigError, ReplayError};
use crate::progress::{LoggingSink, ProgressSink};
use crate::session::ExerciseSession;
use crate::types::{AccelerationSample, PoseFrame, RepetitionEvent};

/// One line of a recorded stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReplayRecord {
    /// Motion event. Any missing axis means the source had no data.
    Motion {
        t: u64,
        x: Option<f32>,
        y: Option<f32>,
        z: Option<f32>,
    },
    /// Pose estimator output for one frame.
    Pose {
        t: u64,
        #[serde(default)]
        keypoints: PoseFrame,
    },
}

impl ReplayRecord {
    /// Parses a single line.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// What happened during a replay.
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    pub motion_samples: u64,
    pub pose_frames: u64,
    pub skipped_lines: u64,
    pub events: Vec<RepetitionEvent>,
    pub pushups: u32,
    pub squats: u32,
    /// True when the stop flag ended the replay before the input did.
    pub stopped: bool,
}

/// Drives a push-up and a squat session from a recorded stream.
pub struct Replay<S: ProgressSink = LoggingSink> {
    pushups: ExerciseSession<S>,
    squats: ExerciseSession<S>,
}

impl Replay<LoggingSink> {
    /// Replay reporting progress through the log.
    pub fn with_logging(config: &TrackerConfig) -> Result<Self, ConfigError> {
        Self::new(config, LoggingSink::new(), LoggingSink::new())
    }
}

impl<S: ProgressSink> Replay<S> {
    pub fn new(config: &TrackerConfig, pushup_sink: S, squat_sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pushups: ExerciseSession::pushups(config.motion.clone(), config.pushup_cap, pushup_sink)?,
            squats: ExerciseSession::squats(config.squat.clone(), config.squat_cap, squat_sink)?,
        })
    }

    /// Feeds one record to the session that consumes it.
    pub fn step(&mut self, record: &ReplayRecord) -> Option<RepetitionEvent> {
        match record {
            ReplayRecord::Motion { t, x, y, z } => {
                let sample = match (x, y, z) {
                    (Some(x), Some(y), Some(z)) => Some(AccelerationSample::new(*x, *y, *z)),
                    _ => None,
                };
                self.pushups.push_motion_optional(sample.as_ref(), *t)
            }
            ReplayRecord::Pose { t, keypoints } => self.squats.push_pose(keypoints, *t),
        }
    }

    /// Replays every line from `reader` until it ends or `stop` is raised.
    pub fn run<R: BufRead>(
        &mut self,
        reader: R,
        stop: &AtomicBool,
    ) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();

        for (index, line) in reader.lines().enumerate() {
            if stop.load(Ordering::Relaxed) {
                log::info!("Replay stopped after {} lines", index);
                summary.stopped = true;
                break;
            }

            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record = match ReplayRecord::parse(line) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping line {}: {}", index + 1, e);
                    summary.skipped_lines += 1;
                    continue;
                }
            };

            match record {
                ReplayRecord::Motion { .. } => summary.motion_samples += 1,
                ReplayRecord::Pose { .. } => summary.pose_frames += 1,
            }

            if let Some(event) = self.step(&record) {
                summary.events.push(event);
            }
        }

        summary.pushups = self.pushups.count().count();
        summary.squats = self.squats.count().count();
        Ok(summary)
    }

    pub fn pushups(&self) -> &ExerciseSession<S> {
        &self.pushups
    }

    pub fn squats(&self) -> &ExerciseSession<S> {
        &self.squats
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingSink;
    use crate::types::Exercise;
    use std::io::{self, Cursor, Read};

    fn recording_replay() -> Replay<RecordingSink> {
        Replay::new(&TrackerConfig::default(), RecordingSink::new(), RecordingSink::new()).unwrap()
    }

    #[test]
    fn test_parse_records() {
        let motion = ReplayRecord::parse(r#"{"kind":"motion","t":5,"x":1.0,"y":2.0,"z":3.0}"#).unwrap();
        assert!(matches!(motion, ReplayRecord::Motion { t: 5, x: Some(_), .. }));

        let empty = ReplayRecord::parse(r#"{"kind":"motion","t":6,"x":null,"y":null,"z":null}"#).unwrap();
        assert!(matches!(empty, ReplayRecord::Motion { x: None, .. }));

        let pose = ReplayRecord::parse(
            r#"{"kind":"pose","t":7,"keypoints":{"left_knee":{"x":0.1,"y":0.2,"confidence":0.8}}}"#,
        )
        .unwrap();
        match pose {
            ReplayRecord::Pose { t, keypoints } => {
                assert_eq!(t, 7);
                assert_eq!(keypoints.len(), 1);
            }
            other => panic!("expected pose, got {:?}", other),
        }

        assert!(ReplayRecord::parse(r#"{"kind":"gyro","t":1}"#).is_err());
    }

    #[test]
    fn test_run_counts_motion_stream() {
        let input = "\
{\"kind\":\"motion\",\"t\":0,\"x\":0.0,\"y\":20.0,\"z\":0.0}
{\"kind\":\"motion\",\"t\":300,\"x\":0.0,\"y\":20.0,\"z\":0.0}

{\"kind\":\"motion\",\"t\":450,\"x\":null,\"y\":null,\"z\":null}
this line is garbage
{\"kind\":\"motion\",\"t\":600,\"x\":0.0,\"y\":20.0,\"z\":0.0}
";
        let mut replay = recording_replay();
        let summary = replay.run(Cursor::new(input), &AtomicBool::new(false)).unwrap();

        assert_eq!(summary.motion_samples, 4);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.pushups, 2);
        assert_eq!(summary.squats, 0);
        assert!(!summary.stopped);
        assert!(summary.events.iter().all(|e| e.exercise == Exercise::Pushups));
        assert_eq!(replay.pushups().sink().count("pushups"), Some(2));
    }

    #[test]
    fn test_pose_line_with_untracked_keypoints_counts() {
        // Left leg bent to 60°: hip (0,0), knee (1,0), ankle at -60° from the knee
        let input = concat!(
            r#"{"kind":"pose","t":0,"keypoints":{"nose":{"x":0.5,"y":-2.0,"confidence":0.99},"#,
            r#""right_ear":{"x":0.6,"y":-2.0,"confidence":0.4},"#,
            r#""left_hip":{"x":0.0,"y":0.0,"confidence":0.9},"#,
            r#""left_knee":{"x":1.0,"y":0.0,"confidence":0.9},"#,
            r#""left_ankle":{"x":1.5,"y":-0.8660254,"confidence":0.9}}}"#,
            "\n"
        );
        let mut replay = recording_replay();
        let summary = replay.run(Cursor::new(input), &AtomicBool::new(false)).unwrap();

        assert_eq!(summary.skipped_lines, 0);
        assert_eq!(summary.pose_frames, 1);
        assert_eq!(summary.squats, 1);
    }

    #[test]
    fn test_stop_flag_halts_before_first_line() {
        let input = "{\"kind\":\"motion\",\"t\":0,\"x\":0.0,\"y\":20.0,\"z\":0.0}\n";
        let mut replay = recording_replay();
        let summary = replay.run(Cursor::new(input), &AtomicBool::new(true)).unwrap();

        assert!(summary.stopped);
        assert_eq!(summary.motion_samples, 0);
        assert_eq!(summary.pushups, 0);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "sensor bridge closed"))
        }
    }

    #[test]
    fn test_io_error_ends_replay() {
        let mut replay = recording_replay();
        let reader = io::BufReader::new(FailingReader);
        let err = replay.run(reader, &AtomicBool::new(false)).unwrap_err();
        assert!(matches!(err, ReplayError::Io(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = TrackerConfig::default();
        config.squat.down_threshold_deg = 150.0;
        assert!(Replay::with_logging(&config).is_err());
    }
}
