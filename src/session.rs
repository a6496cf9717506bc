//! Run orchestration around the simulation
//!
//! Start screen → run → game over → start screen, with best-score
//! bookkeeping and the sound cues that go with each transition.

use std::path::PathBuf;

use crate::audio::{AudioDispatcher, CueSink, SoundCue};
use crate::highscores::{BestScore, ScoreStore};
use crate::sim::{GameEvent, GamePhase, GameState, ScreenSize, Snapshot, TickInput, tick};

/// One player's sitting: many runs sharing a best score and audio settings
pub struct Session<S: ScoreStore, K: CueSink> {
    state: GameState,
    best: BestScore<S>,
    audio: AudioDispatcher<K>,
    /// The last finished run set a new record
    new_record: bool,
    start_requested: bool,
    runs: u32,
    /// Where toggled settings are written, if anywhere
    settings_path: Option<PathBuf>,
}

impl<S: ScoreStore, K: CueSink> Session<S, K> {
    pub fn new(state: GameState, store: S, audio: AudioDispatcher<K>) -> Self {
        let mut session = Self {
            state,
            best: BestScore::new(store),
            audio,
            new_record: false,
            start_requested: false,
            runs: 0,
            settings_path: None,
        };
        session.audio.play(SoundCue::Start);
        session
    }

    /// Persist settings to `path` whenever they change
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Tap on the start screen. Ignored while a run is in progress.
    pub fn tap(&mut self) {
        if self.state.phase() == GamePhase::Ready {
            self.start_requested = true;
        }
    }

    /// Advance one frame
    pub fn frame(&mut self, pointer_x: Option<i32>, screen: ScreenSize, now_ms: u64) -> Snapshot {
        let start = std::mem::take(&mut self.start_requested);
        let input = TickInput {
            pointer_x,
            start,
            screen,
            now_ms,
        };
        let snapshot = tick(&mut self.state, &input);

        if start && self.state.phase() != GamePhase::Ready {
            self.new_record = false;
            self.audio.stop(SoundCue::Start);
            self.audio.play(SoundCue::GameLoop);
        }

        self.audio.dispatch(&snapshot.events);

        let finished = snapshot.events.iter().find_map(|event| match event {
            GameEvent::GameOver { score } => Some(*score),
            _ => None,
        });
        if let Some(score) = finished {
            self.finish_run(score);
        }

        snapshot
    }

    fn finish_run(&mut self, score: u64) {
        self.audio.stop(SoundCue::GameLoop);

        self.new_record = self.best.submit(score);
        if self.new_record {
            log::info!("New record: {}", score);
            self.audio.play(SoundCue::NewRecord);
        } else {
            self.audio.play(SoundCue::GameOver);
        }

        self.runs += 1;
        self.state.reset();
    }

    /// Flip the sound toggle
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.audio.toggle_sound();
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.audio.settings().save(path) {
                log::warn!("Failed to save settings to {}: {}", path.display(), e);
            }
        }
        enabled
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&self) -> u64 {
        self.best.best()
    }

    pub fn new_record(&self) -> bool {
        self.new_record
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn audio(&self) -> &AudioDispatcher<K> {
        &self.audio
    }

    pub fn store(&self) -> &S {
        self.best.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::highscores::MemoryScoreStore;
    use crate::settings::Settings;
    use crate::sim::{Hazard, Rect};
    use crate::tuning::Tuning;

    fn screen() -> ScreenSize {
        ScreenSize::new(800, 1000)
    }

    fn session(record: &str) -> Session<MemoryScoreStore, RecordingSink> {
        let tuning = Tuning {
            base_hazard_cap: 0,
            escalation_interval_ms: u64::MAX,
            ..Tuning::default()
        };
        Session::new(
            GameState::new(tuning, screen(), 5),
            MemoryScoreStore::with_record(record),
            AudioDispatcher::new(RecordingSink::default(), Settings::default()),
        )
    }

    /// Put the run one hit from the end with a hazard about to land
    fn doom(session: &mut Session<MemoryScoreStore, RecordingSink>, score: u64) {
        let state = &mut session.state;
        state.errors = 2;
        state.score = score;
        let player = state.player.rect;
        state.hazards.push(Hazard {
            rect: Rect::square(player.left(), player.top() - 40, 50),
            speed: 5,
            color: [255, 0, 0],
        });
    }

    #[test]
    fn test_tap_starts_run() {
        let mut session = session("");
        assert_eq!(session.audio().sink().played, vec![SoundCue::Start]);

        session.frame(None, screen(), 0);
        assert_eq!(session.state().phase(), GamePhase::Ready);

        session.tap();
        session.frame(None, screen(), 16);
        assert_eq!(session.state().phase(), GamePhase::Running);
        assert_eq!(session.audio().sink().stopped, vec![SoundCue::Start]);
        assert_eq!(
            session.audio().sink().played,
            vec![SoundCue::Start, SoundCue::GameLoop]
        );
    }

    #[test]
    fn test_game_over_with_new_record() {
        let mut session = session("10\n");
        session.tap();
        session.frame(None, screen(), 0);
        doom(&mut session, 25);

        let snapshot = session.frame(None, screen(), 16);
        assert_eq!(snapshot.phase, GamePhase::GameOver);
        assert!(session.new_record());
        assert_eq!(session.best_score(), 25);
        assert_eq!(session.store().record(), "25\n");
        assert_eq!(session.runs(), 1);
        assert_eq!(session.state().phase(), GamePhase::Ready);
        assert_eq!(session.state().score(), 0);

        let played = &session.audio().sink().played;
        assert_eq!(played[played.len() - 2..], [SoundCue::Collision, SoundCue::NewRecord]);
        assert!(session.audio().sink().stopped.contains(&SoundCue::GameLoop));
    }

    #[test]
    fn test_game_over_without_record() {
        let mut session = session("500\n");
        session.tap();
        session.frame(None, screen(), 0);
        doom(&mut session, 25);

        session.frame(None, screen(), 16);
        assert!(!session.new_record());
        assert_eq!(session.best_score(), 500);
        assert_eq!(session.store().record(), "500\n");
        assert_eq!(
            session.audio().sink().played.last(),
            Some(&SoundCue::GameOver)
        );

        // Next run clears the flag
        session.tap();
        session.frame(None, screen(), 32);
        assert!(!session.new_record());
        assert_eq!(session.state().phase(), GamePhase::Running);
    }

    #[test]
    fn test_toggle_sound_mutes_cues() {
        let mut session = session("");
        assert!(!session.toggle_sound());
        session.tap();
        session.frame(None, screen(), 0);
        assert_eq!(session.audio().sink().played, vec![SoundCue::Start]);
    }

    #[test]
    fn test_toggle_sound_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut session = session("").with_settings_path(&path);

        assert!(!session.toggle_sound());
        assert!(!Settings::load(&path).sound_enabled);

        assert!(session.toggle_sound());
        assert!(Settings::load(&path).sound_enabled);
    }
}
