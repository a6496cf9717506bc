//! Collision tests between the player and moving entities
//!
//! Pure functions over entity geometry; applying the outcome (score, lives,
//! recycling) is up to the tick.

use super::rect::Rect;
use super::state::{Bonus, Hazard};

/// What a hazard did this tick after moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardOutcome {
    /// Still on screen, not touching the player
    None,
    /// Left the playfield unhit
    Exited,
    /// Overlaps the player
    HitPlayer,
}

/// Classify a hazard that has already advanced. Leaving the playfield takes
/// precedence over touching the player.
pub fn hazard_outcome(hazard: &Hazard, player: &Rect, screen_height: i32) -> HazardOutcome {
    if hazard.has_exited(screen_height) {
        HazardOutcome::Exited
    } else if player.overlaps(&hazard.rect) {
        HazardOutcome::HitPlayer
    } else {
        HazardOutcome::None
    }
}

/// Whether the player is touching the bonus
pub fn bonus_collected(bonus: &Bonus, player: &Rect) -> bool {
    player.overlaps(&bonus.rect)
}
