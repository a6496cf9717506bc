//! Angle Hunter headless runner
//!
//! Drives a session on a simulated 60 Hz clock with a simple autopilot on the
//! pointer. Useful for balance checks and for watching the event log.

use std::path::PathBuf;

use angle_hunter::audio::{AudioDispatcher, LogSink};
use angle_hunter::consts::{BEST_SCORE_FILE, FRAME_MS, SETTINGS_FILE};
use angle_hunter::sim::{GamePhase, GameState, ScreenSize, Snapshot};
use angle_hunter::{FileScoreStore, Session, Settings, Tuning};
use clap::Parser;

/// Wait on the start screen after a game over, like the real loop does
const GAME_OVER_PAUSE_MS: u64 = 2000;

#[derive(Parser, Debug)]
#[command(name = "angle-hunter")]
#[command(about = "Headless Angle Hunter runner with an autopilot on the pointer")]
struct Cli {
    /// Tuning JSON file (defaults apply when absent or invalid)
    tuning: Option<PathBuf>,
    /// RNG seed for the simulation
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Frames to simulate at 60 Hz
    #[arg(long, default_value_t = 60 * 60 * 5)]
    frames: u64,
    /// Best score record
    #[arg(long, default_value = BEST_SCORE_FILE)]
    best: PathBuf,
    /// Settings file
    #[arg(long, default_value = SETTINGS_FILE)]
    settings: PathBuf,
    /// Flip the saved sound toggle before running
    #[arg(long)]
    toggle_sound: bool,
    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

/// Hold the pointer on the side away from the closest incoming hazard,
/// otherwise chase a bonus
fn autopilot(state: &GameState) -> Option<i32> {
    let player = state.player().rect;
    let screen = state.screen();
    let lookahead = 200;
    let margin = 20;

    let danger = state
        .hazards()
        .iter()
        .filter(|h| {
            let incoming = if h.speed > 0 {
                h.rect.bottom() <= player.bottom() && h.rect.bottom() > player.top() - lookahead
            } else {
                h.rect.top() >= player.top() && h.rect.top() < player.bottom() + lookahead
            };
            incoming
                && h.rect.right() > player.left() - margin
                && h.rect.left() < player.right() + margin
        })
        .min_by_key(|h| (h.rect.center().y - player.center().y).abs());

    if let Some(hazard) = danger {
        let go_right = hazard.rect.center().x < player.center().x;
        return Some(if go_right { screen.width - 1 } else { 0 });
    }

    state.bonuses().first().map(|bonus| {
        if bonus.rect.center().x < player.center().x {
            0
        } else {
            screen.width - 1
        }
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    log::info!("Angle Hunter (headless) starting, seed {:#x}", args.seed);

    let tuning = match &args.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    if let Err(e) = tuning.validate() {
        log::error!("Invalid tuning: {}", e);
        std::process::exit(2);
    }
    let screen = ScreenSize::default();
    let audio = AudioDispatcher::new(LogSink, Settings::load(&args.settings));
    let store = FileScoreStore::new(&args.best);
    let mut session = Session::new(GameState::new(tuning, screen, args.seed), store, audio)
        .with_settings_path(&args.settings);

    if args.toggle_sound {
        let enabled = session.toggle_sound();
        log::info!("Sound {}", if enabled { "on" } else { "off" });
    }

    let mut resume_at = 0;
    let mut best_level = 0;
    let mut last: Option<Snapshot> = None;

    for frame in 0..args.frames {
        let now_ms = frame * FRAME_MS;
        if session.state().phase() == GamePhase::Ready && now_ms >= resume_at {
            session.tap();
        }

        let pointer_x = autopilot(session.state());
        let snapshot = session.frame(pointer_x, screen, now_ms);

        best_level = best_level.max(snapshot.hud.level);
        if snapshot.phase == GamePhase::GameOver {
            log::info!(
                "Run {} over: score {} (best {}{})",
                session.runs(),
                snapshot.hud.score,
                session.best_score(),
                if session.new_record() { ", new record" } else { "" }
            );
            resume_at = now_ms + GAME_OVER_PAUSE_MS;
        }
        last = Some(snapshot);
    }

    log::info!(
        "Finished {} frames: {} runs, best score {}, highest level {}",
        args.frames,
        session.runs(),
        session.best_score(),
        best_level
    );

    if args.dump {
        if let Some(snapshot) = last {
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize snapshot: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["angle-hunter"]).unwrap();
        assert_eq!(cli.tuning, None);
        assert_eq!(cli.seed, 0x5EED);
        assert_eq!(cli.frames, 18_000);
        assert_eq!(cli.best, PathBuf::from(BEST_SCORE_FILE));
        assert_eq!(cli.settings, PathBuf::from(SETTINGS_FILE));
        assert!(!cli.toggle_sound);
        assert!(!cli.dump);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "angle-hunter",
            "tuning.json",
            "--seed",
            "7",
            "--frames",
            "120",
            "--best",
            "/tmp/best.csv",
            "--toggle-sound",
            "--dump",
        ])
        .unwrap();
        assert_eq!(cli.tuning, Some(PathBuf::from("tuning.json")));
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.frames, 120);
        assert_eq!(cli.best, PathBuf::from("/tmp/best.csv"));
        assert!(cli.toggle_sound);
        assert!(cli.dump);
    }

    #[test]
    fn test_cli_rejects_bad_number() {
        assert!(Cli::try_parse_from(["angle-hunter", "--frames", "lots"]).is_err());
    }
}
