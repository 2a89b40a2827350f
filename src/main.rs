//! Rep Sensing CLI
//!
//! Replays a recorded stream of motion samples and pose frames (JSON lines)
//! and prints the final repetition counts.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::Parser;

use rep_sensing::{Replay, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "rep-sensing")]
#[command(about = "Count push-ups and squats from a recorded sensor stream", long_about = None)]
struct Args {
    /// JSON tracker config (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON-lines input file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrackerConfig::default(),
    };
    log::info!(
        "Push-ups: threshold {} / cooldown {}ms, squats: {}°-{}°",
        config.motion.threshold,
        config.motion.cooldown_ms,
        config.squat.down_threshold_deg,
        config.squat.up_threshold_deg
    );

    let mut replay = Replay::with_logging(&config)?;
    let stop = AtomicBool::new(false);

    let summary = match args.input.as_deref() {
        None | Some("-") => replay.run(io::stdin().lock(), &stop)?,
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path))?;
            replay.run(BufReader::new(file), &stop)?
        }
    };

    if summary.skipped_lines > 0 {
        log::warn!("{} input lines could not be read", summary.skipped_lines);
    }

    println!("pushups: {}/{}", summary.pushups, config.pushup_cap);
    println!("squats: {}/{}", summary.squats, config.squat_cap);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_config_and_input() {
        let args = Args::try_parse_from(["rep-sensing", "--config", "tracker.json", "set.jsonl"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("tracker.json")));
        assert_eq!(args.input.as_deref(), Some("set.jsonl"));

        let args = Args::try_parse_from(["rep-sensing", "-c", "t.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("t.json")));
        assert!(args.input.is_none());
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Args::try_parse_from(["rep-sensing", "a.jsonl", "b.jsonl"]).is_err());
    }
}
