//! Render-ready view of the simulation
//!
//! The simulation never draws. Each tick it hands out plain descriptors that
//! an external renderer maps to pixels.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};
use crate::Rgb;

/// Primitive a renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Filled ellipse inscribed in the rect (player, hazards)
    Ellipse,
    Square,
    /// Apex at top-center, base along the bottom edge
    Triangle,
}

/// One thing to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: ShapeKind,
    pub rect: Rect,
    pub color: Rgb,
    /// Rotation about the rect center, degrees
    pub angle: f32,
}

/// Numbers for the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: i32,
    pub level: u32,
}

/// Everything the render/audio layers need after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: Drawable,
    pub hazards: Vec<Drawable>,
    pub bonuses: Vec<Drawable>,
    pub hud: Hud,
    /// Events emitted during this tick only
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase(),
            player: state.player().drawable(),
            hazards: state.hazards().iter().map(|h| h.drawable()).collect(),
            bonuses: state.bonuses().iter().map(|b| b.drawable()).collect(),
            hud: Hud {
                score: state.score(),
                lives: state.lives(),
                level: state.level(),
            },
            events: state.events().to_vec(),
        }
    }
}
