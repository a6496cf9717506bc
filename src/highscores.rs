//! Best score persistence
//!
//! The record is a single comma-delimited text line whose first field is the
//! score. A missing or unreadable record counts as no record (score 0); the
//! player never sees a persistence error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors writing persisted data
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage for the single best score
pub trait ScoreStore {
    /// Stored score, 0 when absent or corrupt
    fn load(&self) -> u64;
    fn save(&mut self, score: u64) -> Result<(), PersistError>;
}

/// Parse a best score record. Only the first field of the first line counts.
pub fn parse_record(text: &str) -> Option<u64> {
    let line = text.lines().next()?;
    let field = line.split(',').next()?;
    field.trim().parse().ok()
}

/// Serialize a best score record
pub fn format_record(score: u64) -> String {
    format!("{}\n", score)
}

/// Best score kept in a small text file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> u64 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No best score at {}, starting fresh", self.path.display());
                return 0;
            }
            Err(e) => {
                log::warn!("Failed to read best score {}: {}", self.path.display(), e);
                return 0;
            }
        };

        match parse_record(&text) {
            Some(score) => {
                log::info!("Loaded best score {}", score);
                score
            }
            None => {
                log::warn!("Corrupt best score record at {}, ignoring", self.path.display());
                0
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, format_record(score))?;
        fs::rename(&tmp, &self.path)?;

        log::info!("Best score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// In-memory record, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    record: String,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw record text (possibly corrupt)
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
        }
    }

    pub fn record(&self) -> &str {
        &self.record
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u64 {
        parse_record(&self.record).unwrap_or(0)
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        self.record = format_record(score);
        Ok(())
    }
}

/// Cached best score backed by a store
#[derive(Debug, Clone)]
pub struct BestScore<S: ScoreStore> {
    store: S,
    best: u64,
}

impl<S: ScoreStore> BestScore<S> {
    /// Read the store once
    pub fn new(store: S) -> Self {
        let best = store.load();
        Self { store, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would set a new record
    pub fn beats(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run's score. Returns true for a new record, which is
    /// also written to the store. Write failures are logged, not returned.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.beats(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.save(score) {
            log::warn!("Failed to save best score {}: {}", score, e);
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
