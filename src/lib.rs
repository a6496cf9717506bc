//! Angle Hunter - a single-screen arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best score persistence
//! - `settings`: Player preferences
//! - `audio`: Semantic sound cues for an external playback layer
//! - `session`: Start screen / run / game over orchestration

pub mod audio;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScore, FileScoreStore, MemoryScoreStore, PersistError, ScoreStore};
pub use session::Session;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Constants that are not part of the tunable balance
pub mod consts {
    /// Target frame rate of the game loop
    pub const FPS: u32 = 60;
    /// Milliseconds per frame at the target frame rate
    pub const FRAME_MS: u64 = 1000 / FPS as u64;
    /// Default playfield size used by the headless runner
    pub const DEFAULT_SCREEN_WIDTH: i32 = 1080;
    pub const DEFAULT_SCREEN_HEIGHT: i32 = 1920;
    /// Default best score record location
    pub const BEST_SCORE_FILE: &str = "best_score.csv";
    /// Default settings location
    pub const SETTINGS_FILE: &str = "settings.json";
}

/// An RGB colour
pub type Rgb = [u8; 3];
