//! Data-driven game balance
//!
//! Every size, speed, threshold and interval the simulation reads comes from
//! a [`Tuning`]. It is fixed for the lifetime of a run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rgb;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Side of the player square (pixels)
    pub player_size: i32,
    /// Horizontal step per tick while the pointer is held
    pub player_speed: i32,
    pub player_color: Rgb,

    // === Hazards ===
    /// Side of a hazard square (pixels)
    pub enemy_size: i32,
    /// Starting hazard speed (pixels per tick)
    pub enemy_speed: i32,
    /// Hazard palette, one picked at random per spawn
    pub enemy_colors: Vec<Rgb>,
    /// Hazards allowed on screen before random spawning stops (plus level)
    pub base_hazard_cap: usize,
    /// One in N chance per tick of a random hazard spawn
    pub spawn_chance_denominator: u32,
    /// Probability that a new hazard enters from the top edge
    pub top_spawn_chance: f64,
    /// Starting value of the escalation hazard-count target
    pub initial_enemy_count: u32,
    /// Fraction of the count target spawned as extra hazards on level-up
    pub enemy_increment_percentage: f64,

    // === Bonuses ===
    /// Side of a bonus square (pixels)
    pub special_size: i32,
    /// A bonus spawns whenever score is a positive multiple of this
    pub points_for_special: u64,
    /// Added to the current hazard speed for a new bonus
    pub bonus_speed_offset: i32,
    /// Rotation per tick (degrees)
    pub bonus_spin_step: f32,
    pub square_points: u64,
    pub triangle_points: u64,
    pub square_color: Rgb,
    pub triangle_color: Rgb,

    // === Progression ===
    /// Starting lives-margin (displayed lives are one less)
    pub error_margin: i32,
    /// Real time between difficulty escalations (ms)
    pub escalation_interval_ms: u64,
    /// Level every run starts at
    pub initial_level: u32,
    /// Every Nth level permanently raises the hazard-count target
    pub count_step_levels: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 50,
            player_speed: 10,
            player_color: [0, 200, 255],

            enemy_size: 50,
            enemy_speed: 5,
            enemy_colors: vec![
                [255, 60, 60],
                [255, 140, 0],
                [255, 220, 0],
                [200, 60, 255],
                [60, 255, 120],
            ],
            base_hazard_cap: 40,
            spawn_chance_denominator: 30,
            top_spawn_chance: 2.0 / 3.0,
            initial_enemy_count: 1,
            enemy_increment_percentage: 1.0,

            special_size: 40,
            points_for_special: 50,
            bonus_speed_offset: 2,
            bonus_spin_step: 5.0,
            square_points: 60,
            triangle_points: 40,
            square_color: [255, 215, 0],
            triangle_color: [0, 255, 255],

            error_margin: 4,
            escalation_interval_ms: 10_000,
            initial_level: 0,
            count_step_levels: 9,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a tuning file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> TuningError {
            TuningError::Invalid { field, reason }
        }

        if self.player_size <= 0 {
            return Err(invalid("player_size", "must be positive"));
        }
        if self.enemy_size <= 0 {
            return Err(invalid("enemy_size", "must be positive"));
        }
        if self.special_size <= 0 {
            return Err(invalid("special_size", "must be positive"));
        }
        if self.enemy_speed <= 0 {
            return Err(invalid("enemy_speed", "must be positive"));
        }
        if self.spawn_chance_denominator == 0 {
            return Err(invalid("spawn_chance_denominator", "must be non-zero"));
        }
        if self.points_for_special == 0 {
            return Err(invalid("points_for_special", "must be non-zero"));
        }
        if self.count_step_levels == 0 {
            return Err(invalid("count_step_levels", "must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.top_spawn_chance) {
            return Err(invalid("top_spawn_chance", "must be within [0, 1]"));
        }
        if !self.enemy_increment_percentage.is_finite() || self.enemy_increment_percentage < 0.0 {
            return Err(invalid("enemy_increment_percentage", "must be non-negative"));
        }
        if self.enemy_colors.is_empty() {
            return Err(invalid("enemy_colors", "palette is empty"));
        }
        if self.error_margin < 2 {
            return Err(invalid("error_margin", "must leave at least one life"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "enemy_speed": 9, "error_margin": 6 }"#).unwrap();
        assert_eq!(tuning.enemy_speed, 9);
        assert_eq!(tuning.error_margin, 6);
        assert_eq!(tuning.player_size, Tuning::default().player_size);
        assert_eq!(tuning.square_points, 60);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "enemy_colors": [] }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "enemy_colors", .. }));

        let err = Tuning::from_json(r#"{ "top_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "top_spawn_chance", .. }));

        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/nonexistent/angle-hunter/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }
}
