//! Neon Runner entry point
//!
//! Native builds run one headless session steered by an autopilot and print
//! the summary. Useful for tuning and for checking determinism by seed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use neon_runner::app::{FrameInput, Screen};
use neon_runner::input::Key;
use neon_runner::menu::GameHud;
use neon_runner::{App, BestScores, GameContext, Scene, Settings, modes};

/// Simulated frame time
const FRAME_DT: f32 = 1.0 / 60.0;
/// Log the HUD every 30 simulated seconds
const HUD_LOG_FRAMES: u64 = 60 * 30;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Neon Runner session with an autopilot")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Mode name: kids, elderly, leg-free or hand-free
    #[arg(long)]
    mode: Option<String>,

    /// Tuning JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Best-score JSON file, loaded at start and saved after the session
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Run the calibration sequence before play
    #[arg(long, default_value_t = false)]
    calibrate: bool,

    /// Steer with a continuous gesture value instead of lane keys
    #[arg(long, default_value_t = false)]
    gesture: bool,
}

/// Steer toward the nearest orb still ahead of the player
fn autopilot(app: &App, gesture: bool) -> FrameInput {
    let Some(session) = app.session() else {
        return FrameInput::default();
    };
    let (Some(lane), Some(orbs)) = (session.lane(), session.orbs()) else {
        return FrameInput::default();
    };

    let target = orbs
        .active()
        .filter(|(_, orb)| orb.pos.z > 0.0)
        .min_by(|a, b| a.1.pos.z.total_cmp(&b.1.pos.z))
        .map(|(_, orb)| orb.lane);

    let Some(target) = target else {
        return FrameInput::default();
    };

    if gesture {
        // Lean proportionally: lanes 0/1/2 -> -0.8/0/0.8
        FrameInput {
            keys: Vec::new(),
            steer: Some((target as f32 - 1.0) * 0.8),
        }
    } else {
        let keys = match target.cmp(&lane.lane()) {
            std::cmp::Ordering::Less => vec![Key::Left],
            std::cmp::Ordering::Greater => vec![Key::Right],
            std::cmp::Ordering::Equal => Vec::new(),
        };
        FrameInput { keys, steer: None }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    let best_scores = args
        .scores
        .as_deref()
        .map(BestScores::load_or_default)
        .unwrap_or_default();
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    log::info!("Neon Runner (headless) starting with seed {}", seed);
    let max_frames = ((settings.session.max_duration_secs + 10.0) / FRAME_DT) as u64;

    let mut app = App::new(settings, GameContext::with_best_scores(best_scores), seed);
    if let Some(path) = args.scores.clone() {
        app = app.with_scores_path(path);
    }

    // Mode selection: hotkey for the requested mode, then start
    let mut keys = Vec::new();
    if let Some(name) = &args.mode {
        let index = modes::index_of(modes::by_name(name).mode);
        keys.push(Key::Digit(index as u8 + 1));
    }
    keys.push(if args.calibrate { Key::Enter } else { Key::Space });
    app.update(&FrameInput { keys, steer: None }, 0.0);

    let mut hud = GameHud::new(app.ctx().profile());
    let mut frames = 0;
    while app.scene() == Scene::Gameplay && frames < max_frames {
        let input = autopilot(&app, args.gesture);
        app.update(&input, FRAME_DT);
        frames += 1;

        if let Some(frame) = app.hud_frame() {
            hud.update(&frame, FRAME_DT);
            if hud.is_visible() && frames % HUD_LOG_FRAMES == 0 {
                log::info!("HUD | {}", hud.lines().join(" | "));
            }
        }
    }

    let Screen::Summary(summary) = app.screen() else {
        log::error!("Session did not finish after {} frames", frames);
        return ExitCode::FAILURE;
    };

    println!();
    for line in summary.lines() {
        println!("{}", line);
    }
    println!("Orbs Collected: {}", summary.ledger().orbs_collected);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "neon-runner",
            "--seed",
            "42",
            "--mode",
            "kids",
            "--scores",
            "best.json",
            "--calibrate",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.mode.as_deref(), Some("kids"));
        assert_eq!(args.scores, Some(PathBuf::from("best.json")));
        assert!(args.calibrate);
        assert!(!args.gesture);
        assert!(args.settings.is_none());
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        assert!(Args::try_parse_from(["neon-runner", "--seed", "soon"]).is_err());
        assert!(Args::try_parse_from(["neon-runner", "--turbo"]).is_err());
    }
}
