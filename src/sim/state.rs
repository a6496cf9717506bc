//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]. Entities hold no
//! references to each other or to the state that owns them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::snapshot::{Drawable, ShapeKind};
use crate::Rgb;
use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    #[default]
    Ready,
    /// Active gameplay
    Running,
    /// Run ended, waiting for reset
    GameOver,
}

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

/// Bonus shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusShape {
    Square,
    Triangle,
}

/// Something that happened during a tick, for the audio/render layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A hazard hit the player
    Collision,
    /// The player picked up a bonus
    BonusCollected { shape: BonusShape, points: u64 },
    /// Difficulty escalated
    LevelUp { level: u32 },
    /// Lives ran out
    GameOver { score: u64 },
}

/// The player's shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub color: Rgb,
}

impl Player {
    /// Centered horizontally, three fifths of the way down the screen
    pub fn new(screen: ScreenSize, size: i32, color: Rgb) -> Self {
        Self {
            rect: Rect::square(
                screen.width / 2 - size / 2,
                screen.height * 3 / 5,
                size,
            ),
            color,
        }
    }

    /// Step toward the side of the screen the pointer is on, then clamp
    pub fn move_toward(&mut self, pointer_x: i32, screen_width: i32, step: i32) {
        if pointer_x < screen_width / 2 {
            self.rect.pos.x -= step;
        } else {
            self.rect.pos.x += step;
        }
        self.clamp_to(screen_width);
    }

    /// Keep the player inside `[0, screen_width - size]`
    pub fn clamp_to(&mut self, screen_width: i32) {
        let max_x = screen_width - self.rect.size.x;
        self.rect.pos.x = self.rect.pos.x.min(max_x).max(0);
    }

    pub fn drawable(&self) -> Drawable {
        Drawable {
            kind: ShapeKind::Ellipse,
            rect: self.rect,
            color: self.color,
            angle: 0.0,
        }
    }
}

/// A falling or rising obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub rect: Rect,
    /// Pixels per tick; positive descends, negative ascends
    pub speed: i32,
    pub color: Rgb,
}

impl Hazard {
    pub fn advance(&mut self) {
        self.rect.pos.y += self.speed;
    }

    /// Fully outside the playfield, above or below
    pub fn has_exited(&self, screen_height: i32) -> bool {
        self.rect.top() > screen_height || self.rect.bottom() < 0
    }

    /// Send the hazard back to the edge its speed carries it away from
    pub fn recycle(&mut self, x: i32, screen_height: i32) {
        self.rect.pos.x = x;
        self.rect.pos.y = if self.speed > 0 {
            -self.rect.size.y
        } else {
            screen_height
        };
    }

    pub fn drawable(&self) -> Drawable {
        Drawable {
            kind: ShapeKind::Ellipse,
            rect: self.rect,
            color: self.color,
            angle: 0.0,
        }
    }
}

/// A rotating collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u32,
    pub rect: Rect,
    pub speed: i32,
    pub shape: BonusShape,
    pub color: Rgb,
    /// Cosmetic rotation in degrees, [0, 360)
    pub angle: f32,
    pub spin_step: f32,
    pub points: u64,
}

impl Bonus {
    pub fn advance(&mut self) {
        self.rect.pos.y += self.speed;
        self.angle = (self.angle + self.spin_step).rem_euclid(360.0);
    }

    pub fn has_exited(&self, screen_height: i32) -> bool {
        self.rect.top() > screen_height
    }

    pub fn drawable(&self) -> Drawable {
        let kind = match self.shape {
            BonusShape::Square => ShapeKind::Square,
            BonusShape::Triangle => ShapeKind::Triangle,
        };
        Drawable {
            kind,
            rect: self.rect,
            color: self.color,
            angle: self.angle,
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub(crate) screen: ScreenSize,
    pub(crate) phase: GamePhase,
    pub(crate) player: Player,
    /// Recycled in place, only cleared on reset
    pub(crate) hazards: Vec<Hazard>,
    pub(crate) bonuses: Vec<Bonus>,
    pub(crate) score: u64,
    /// Lives-margin; displayed lives are one less
    pub(crate) errors: i32,
    pub(crate) enemy_speed: i32,
    /// Escalation target that scales the extra hazards spawned per level
    pub(crate) enemy_count: u32,
    pub(crate) level: u32,
    /// Clock value (ms) of the last observed tick
    pub(crate) clock_ms: u64,
    pub(crate) last_escalation_ms: u64,
    /// Events emitted by the current tick
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with a seeded RNG
    pub fn new(tuning: Tuning, screen: ScreenSize, seed: u64) -> Self {
        Self::with_rng(tuning, screen, Pcg32::seed_from_u64(seed))
    }

    /// Create a new game state around an existing RNG.
    ///
    /// `tuning` must pass [`Tuning::validate`]; zero denominators would panic
    /// mid-tick.
    pub fn with_rng(tuning: Tuning, screen: ScreenSize, rng: Pcg32) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning: {tuning:?}");
        let player = Player::new(screen, tuning.player_size, tuning.player_color);
        let hazard_capacity = tuning.base_hazard_cap + 16;
        Self {
            errors: tuning.error_margin,
            enemy_speed: tuning.enemy_speed,
            enemy_count: tuning.initial_enemy_count,
            level: tuning.initial_level,
            tuning,
            rng,
            screen,
            phase: GamePhase::Ready,
            player,
            hazards: Vec::with_capacity(hazard_capacity),
            bonuses: Vec::new(),
            score: 0,
            clock_ms: 0,
            last_escalation_ms: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Back to a fresh Ready state. The escalation timer restarts at the
    /// last observed clock value.
    pub fn reset(&mut self) {
        self.score = 0;
        self.errors = self.tuning.error_margin;
        self.hazards.clear();
        self.bonuses.clear();
        self.phase = GamePhase::Ready;
        self.enemy_speed = self.tuning.enemy_speed;
        self.enemy_count = self.tuning.initial_enemy_count;
        self.level = self.tuning.initial_level;
        self.last_escalation_ms = self.clock_ms;
        self.events.clear();
        self.player = Player::new(self.screen, self.tuning.player_size, self.tuning.player_color);
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform x for an entity of width `size` that keeps it on screen
    pub(crate) fn random_x(&mut self, size: i32) -> i32 {
        let max_x = (self.screen.width - size).max(0);
        self.rng.random_range(0..=max_x)
    }

    /// Add a hazard at a random x entering from a random edge
    pub(crate) fn spawn_hazard(&mut self) {
        let size = self.tuning.enemy_size;
        let x = self.random_x(size);
        let from_top = self.rng.random::<f64>() < self.tuning.top_spawn_chance;
        let (y, speed) = if from_top {
            (-size, self.enemy_speed)
        } else {
            (self.screen.height, -self.enemy_speed)
        };
        let palette = &self.tuning.enemy_colors;
        let color = palette[self.rng.random_range(0..palette.len())];

        self.hazards.push(Hazard {
            rect: Rect::square(x, y, size),
            speed,
            color,
        });
    }

    /// Add a bonus above the top edge with a random shape
    pub(crate) fn spawn_bonus(&mut self) {
        let size = self.tuning.special_size;
        let x = self.random_x(size);
        let shape = if self.rng.random_bool(0.5) {
            BonusShape::Square
        } else {
            BonusShape::Triangle
        };
        let (color, points) = match shape {
            BonusShape::Square => (self.tuning.square_color, self.tuning.square_points),
            BonusShape::Triangle => (self.tuning.triangle_color, self.tuning.triangle_points),
        };
        let id = self.next_entity_id();

        log::debug!("Spawning {:?} bonus #{} at x={}", shape, id, x);
        self.bonuses.push(Bonus {
            id,
            rect: Rect::square(x, -size, size),
            speed: self.enemy_speed + self.tuning.bonus_speed_offset,
            shape,
            color,
            angle: 0.0,
            spin_step: self.tuning.bonus_spin_step,
            points,
        });
    }

    /// Renderable descriptors: player first, then hazards, then bonuses
    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        std::iter::once(self.player.drawable())
            .chain(self.hazards.iter().map(Hazard::drawable))
            .chain(self.bonuses.iter().map(Bonus::drawable))
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Raw lives-margin counter
    pub fn errors(&self) -> i32 {
        self.errors
    }

    /// Lives as shown to the player
    pub fn lives(&self) -> i32 {
        self.errors - 1
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn enemy_speed(&self) -> i32 {
        self.enemy_speed
    }

    pub fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    /// Events emitted by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenSize {
        ScreenSize::new(800, 1000)
    }

    #[test]
    fn test_player_starts_centered() {
        let state = GameState::new(Tuning::default(), screen(), 1);
        assert_eq!(state.player.rect.left(), 400 - 25);
        assert_eq!(state.player.rect.top(), 600);
        assert_eq!(state.phase(), GamePhase::Ready);
        assert_eq!(state.lives(), 3);
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut player = Player::new(screen(), 50, [0, 0, 0]);
        player.move_toward(10, 800, 10);
        assert_eq!(player.rect.left(), 365);
        player.move_toward(400, 800, 10);
        assert_eq!(player.rect.left(), 375);

        for _ in 0..100 {
            player.move_toward(0, 800, 10);
        }
        assert_eq!(player.rect.left(), 0);

        for _ in 0..100 {
            player.move_toward(799, 800, 10);
        }
        assert_eq!(player.rect.left(), 750);
    }

    #[test]
    #[should_panic(expected = "unvalidated tuning")]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            points_for_special: 0,
            ..Tuning::default()
        };
        GameState::new(tuning, screen(), 1);
    }

    #[test]
    fn test_hazard_recycle_edge_follows_speed() {
        let mut hazard = Hazard {
            rect: Rect::square(10, 500, 50),
            speed: 5,
            color: [1, 2, 3],
        };
        hazard.recycle(77, 1000);
        assert_eq!(hazard.rect.pos.x, 77);
        assert_eq!(hazard.rect.top(), -50);

        hazard.speed = -5;
        hazard.recycle(12, 1000);
        assert_eq!(hazard.rect.top(), 1000);
    }

    #[test]
    fn test_hazard_exit_bounds() {
        let mut hazard = Hazard {
            rect: Rect::square(0, -50, 50),
            speed: 5,
            color: [0, 0, 0],
        };
        assert!(!hazard.has_exited(1000));
        hazard.rect.pos.y = 1000;
        assert!(!hazard.has_exited(1000));
        hazard.rect.pos.y = 1001;
        assert!(hazard.has_exited(1000));
        hazard.rect.pos.y = -51;
        assert!(hazard.has_exited(1000));
    }

    #[test]
    fn test_spawned_hazards_match_edge() {
        let mut state = GameState::new(Tuning::default(), screen(), 42);
        for _ in 0..200 {
            state.spawn_hazard();
        }
        for hazard in state.hazards() {
            assert!(hazard.rect.left() >= 0 && hazard.rect.right() <= 800);
            if hazard.speed > 0 {
                assert_eq!(hazard.rect.top(), -50);
            } else {
                assert_eq!(hazard.rect.top(), 1000);
            }
            assert!(state.tuning.enemy_colors.contains(&hazard.color));
        }
        let from_top = state.hazards().iter().filter(|h| h.speed > 0).count();
        // 2:1 weighting toward the top edge
        assert!(from_top > 100 && from_top < 170, "from_top = {from_top}");
    }

    #[test]
    fn test_bonus_spin_wraps() {
        let mut state = GameState::new(Tuning::default(), screen(), 3);
        state.spawn_bonus();
        let bonus = &mut state.bonuses[0];
        assert_eq!(bonus.speed, 7);
        for _ in 0..80 {
            bonus.advance();
        }
        assert!((bonus.angle - 40.0).abs() < 0.001);
        assert_eq!(bonus.rect.top(), -40 + 80 * 7);
    }

    #[test]
    fn test_drawables_order() {
        let mut state = GameState::new(Tuning::default(), screen(), 9);
        state.spawn_hazard();
        state.spawn_hazard();
        state.spawn_bonus();
        let drawables: Vec<_> = state.drawables().collect();
        assert_eq!(drawables.len(), 4);
        assert_eq!(drawables[0].rect, state.player.rect);
        assert_eq!(drawables[1].kind, ShapeKind::Ellipse);
        assert!(matches!(drawables[3].kind, ShapeKind::Square | ShapeKind::Triangle));
    }
}
