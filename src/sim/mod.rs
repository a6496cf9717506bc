//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock supplied by the caller, never read internally
//! - Seeded RNG only
//! - Stable iteration order (hazard pool index, bonus spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{HazardOutcome, bonus_collected, hazard_outcome};
pub use rect::Rect;
pub use snapshot::{Drawable, Hud, ShapeKind, Snapshot};
pub use state::{Bonus, BonusShape, GameEvent, GamePhase, GameState, Hazard, Player, ScreenSize};
pub use tick::{TickInput, tick};
