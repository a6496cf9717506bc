//! Sound cue dispatch
//!
//! The simulation only emits events. This module turns them into semantic
//! cues and forwards those to whatever playback backend is plugged in.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Start screen jingle
    Start,
    /// Looping background music during a run
    GameLoop,
    /// Hazard hit the player
    Collision,
    /// Bonus collected
    SpecialItem,
    /// Run ended without a new record
    GameOver,
    /// Run ended with a new best score
    NewRecord,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Start,
        SoundCue::GameLoop,
        SoundCue::Collision,
        SoundCue::SpecialItem,
        SoundCue::GameOver,
        SoundCue::NewRecord,
    ];

    /// Stable tag for backends keyed by name
    pub fn tag(&self) -> &'static str {
        match self {
            SoundCue::Start => "start",
            SoundCue::GameLoop => "game_loop",
            SoundCue::Collision => "collision",
            SoundCue::SpecialItem => "special_item",
            SoundCue::GameOver => "game_over",
            SoundCue::NewRecord => "new_record",
        }
    }

    /// Default asset file, relative to the sounds directory
    pub fn asset(&self) -> &'static str {
        match self {
            SoundCue::Start => "gamestart-272829.mp3",
            SoundCue::GameLoop => "8-bit-game-music-122259.mp3",
            SoundCue::Collision => "retro-explode-1-236678.mp3",
            SoundCue::SpecialItem => "8-bit-game-6-188105.mp3",
            SoundCue::GameOver => "videogame-death-sound-43894.mp3",
            SoundCue::NewRecord => "win-sfx-38507.mp3",
        }
    }

    /// Whether the cue should loop until stopped
    pub fn looping(&self) -> bool {
        matches!(self, SoundCue::GameLoop)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cue| cue.tag() == tag)
    }

    /// Cue for a simulation event. Game over is left to the session, which
    /// knows whether the run set a record.
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Collision => Some(SoundCue::Collision),
            GameEvent::BonusCollected { .. } => Some(SoundCue::SpecialItem),
            GameEvent::LevelUp { .. } | GameEvent::GameOver { .. } => None,
        }
    }
}

/// Playback backend
pub trait CueSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
    fn stop(&mut self, cue: SoundCue);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("play {} ({}) at {:.2}", cue.tag(), cue.asset(), volume);
    }

    fn stop(&mut self, cue: SoundCue) {
        log::debug!("stop {}", cue.tag());
    }
}

/// Backend that remembers what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub played: Vec<SoundCue>,
    pub stopped: Vec<SoundCue>,
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: SoundCue, _volume: f32) {
        self.played.push(cue);
    }

    fn stop(&mut self, cue: SoundCue) {
        self.stopped.push(cue);
    }
}

/// Forwards cues to a sink, honouring the sound toggle and volume
#[derive(Debug, Clone)]
pub struct AudioDispatcher<K: CueSink> {
    sink: K,
    settings: Settings,
}

impl<K: CueSink> AudioDispatcher<K> {
    pub fn new(sink: K, settings: Settings) -> Self {
        Self { sink, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    /// Play a cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol);
    }

    /// Stop a cue (always forwarded so a muted toggle silences it)
    pub fn stop(&mut self, cue: SoundCue) {
        self.sink.stop(cue);
    }

    /// Play the cues for a tick's events
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(SoundCue::for_event) {
            self.play(cue);
        }
    }

    /// Flip the sound toggle; turning it on replays the start jingle
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        if enabled {
            self.play(SoundCue::Start);
        } else {
            self.stop(SoundCue::Start);
        }
        enabled
    }
}
