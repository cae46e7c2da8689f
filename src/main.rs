//! Brick Arena headless driver
//!
//! Runs the simulation with the autopilot at a fixed frame rate and logs what
//! happens. Rendering and real input live in the embedding application.

use std::path::PathBuf;
use std::process::ExitCode;

use brick_arena::sim::autopilot;
use brick_arena::{Arena, GameEvent, Tuning};
use clap::Parser;

/// Frame delta the driver feeds to `advance` (60 FPS)
const FRAME_DT: f32 = 1.0 / 60.0;

/// Headless Brick Arena run driven by the autopilot.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with tuning overrides; missing fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,
    /// Simulated time to run, in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 120.0, value_parser = parse_seconds)]
    seconds: f32,
    /// Seed for the arena's deterministic RNG.
    #[arg(long, value_name = "SEED", default_value_t = 1)]
    seed: u64,
    /// Print the final snapshot as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

fn parse_seconds(value: &str) -> Result<f32, String> {
    let seconds: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("'{value}' must be a finite, non-negative number"));
    }
    Ok(seconds)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::StageCleared { stage, bonus } => {
            log::info!("Stage {} cleared (+{})", stage, bonus)
        }
        GameEvent::LifeLost { lives } => log::info!("Ball lost, {} lives left", lives),
        GameEvent::RunOver { score, stage } => {
            log::info!("Game over: score {} on stage {}", score, stage)
        }
        GameEvent::SpeedUp { speed } => log::debug!("Speed up: {:.0}", speed),
        GameEvent::BrickDestroyed { id, points } => {
            log::debug!("Brick {} destroyed (+{})", id, points)
        }
        GameEvent::BrickDamaged { id, hp, points } => {
            log::debug!("Brick {} cracked, {} hp left (+{})", id, hp, points)
        }
        GameEvent::PaddleHit { offset } => log::trace!("Paddle hit at {:+.2}", offset),
        GameEvent::Launched => log::trace!("Launched"),
        GameEvent::WallBounce => log::trace!("Wall bounce"),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        },
        None => Tuning::default(),
    };

    let mut arena = match Arena::try_new(tuning, args.seed) {
        Ok(arena) => arena,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let frames = (args.seconds / FRAME_DT).round() as u64;
    let mut frame = 0;
    while frame < frames && !arena.is_run_over() {
        arena.set_paddle_target(autopilot::target_x(arena.state(), arena.tuning()));
        if autopilot::wants_launch(arena.state()) {
            arena.launch_ball();
        }
        for event in arena.advance(FRAME_DT) {
            log_event(&event);
        }
        frame += 1;
    }

    if args.json {
        match serde_json::to_string_pretty(&arena.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("cannot serialize snapshot: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "{:.1}s simulated: score {}, stage {}, lives {}{}",
            frame as f32 * FRAME_DT,
            arena.score(),
            arena.stage(),
            arena.lives(),
            if arena.is_run_over() { " (game over)" } else { "" }
        );
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["brick-arena"]).unwrap();
        assert!(args.tuning.is_none());
        assert_eq!(args.seconds, 120.0);
        assert_eq!(args.seed, 1);
        assert!(!args.json);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "brick-arena",
            "--tuning",
            "arena.json",
            "--seconds",
            "30",
            "--seed",
            "7",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.tuning, Some(PathBuf::from("arena.json")));
        assert_eq!(args.seconds, 30.0);
        assert_eq!(args.seed, 7);
        assert!(args.json);
    }

    #[test]
    fn test_seconds_rejects_non_finite_and_negative() {
        for bad in ["inf", "-inf", "NaN", "-1", "-0.5", "soon"] {
            assert!(parse_seconds(bad).is_err(), "{bad} should be rejected");
            assert!(
                Args::try_parse_from(["brick-arena", "--seconds", bad]).is_err(),
                "{bad} should fail argument parsing"
            );
        }
        assert_eq!(parse_seconds("0"), Ok(0.0));
        assert_eq!(parse_seconds("2.5"), Ok(2.5));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::try_parse_from(["brick-arena", "--turbo"]).is_err());
    }
}
