//! Per-frame simulation tick
//!
//! Core game loop step: input, spawning, movement, collisions, scoring and
//! difficulty escalation, in that order.

use rand::Rng;

use super::collision::{HazardOutcome, bonus_collected, hazard_outcome};
use super::snapshot::Snapshot;
use super::state::{GameEvent, GamePhase, GameState, ScreenSize};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal pointer/touch position while the primary button is held
    pub pointer_x: Option<i32>,
    /// Start a run (tap on the ready screen)
    pub start: bool,
    /// Current playfield size
    pub screen: ScreenSize,
    /// Monotonic clock (ms)
    pub now_ms: u64,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Snapshot {
    state.events.clear();
    state.clock_ms = input.now_ms;
    state.screen = input.screen;
    state.player.clamp_to(state.screen.width);

    match state.phase {
        GamePhase::Ready => {
            if !input.start {
                return Snapshot::capture(state);
            }
            state.reset();
            state.phase = GamePhase::Running;
            log::info!("Run started at level {}", state.level);
        }
        GamePhase::GameOver => return Snapshot::capture(state),
        GamePhase::Running => {}
    }

    if let Some(pointer_x) = input.pointer_x {
        let step = state.tuning.player_speed;
        state.player.move_toward(pointer_x, state.screen.width, step);
    }

    spawn_hazards(state);
    spawn_bonus(state);

    update_hazards(state);
    if state.phase == GamePhase::GameOver {
        return Snapshot::capture(state);
    }

    update_bonuses(state);
    collect_bonuses(state);
    escalate(state);

    Snapshot::capture(state)
}

/// Random trickle of new hazards while under the cap
fn spawn_hazards(state: &mut GameState) {
    let cap = state.tuning.base_hazard_cap + state.level as usize;
    if state.hazards.len() < cap {
        let denominator = state.tuning.spawn_chance_denominator;
        if state.rng.random_range(1..=denominator) == 1 {
            state.spawn_hazard();
        }
    }
}

/// One bonus per score milestone, never two at once
fn spawn_bonus(state: &mut GameState) {
    if state.score > 0
        && state.score % state.tuning.points_for_special == 0
        && state.bonuses.is_empty()
    {
        state.spawn_bonus();
    }
}

fn recycle_hazard(state: &mut GameState, index: usize) {
    let size = state.hazards[index].rect.size.x;
    let x = state.random_x(size);
    let screen_height = state.screen.height;
    state.hazards[index].recycle(x, screen_height);
}

/// Move every hazard, then recycle the ones that left or hit the player.
/// Stops as soon as the run ends.
fn update_hazards(state: &mut GameState) {
    let screen_height = state.screen.height;

    for index in 0..state.hazards.len() {
        state.hazards[index].advance();

        match hazard_outcome(&state.hazards[index], &state.player.rect, screen_height) {
            HazardOutcome::None => {}
            HazardOutcome::Exited => {
                recycle_hazard(state, index);
                state.score += 1;
            }
            HazardOutcome::HitPlayer => {
                recycle_hazard(state, index);
                state.errors -= 1;
                state.events.push(GameEvent::Collision);
                log::debug!("Hazard {} hit player, errors now {}", index, state.errors);

                if state.errors <= 1 {
                    state.phase = GamePhase::GameOver;
                    state.events.push(GameEvent::GameOver { score: state.score });
                    log::info!(
                        "Game over: score {} at level {}",
                        state.score,
                        state.level
                    );
                    return;
                }
            }
        }
    }
}

fn update_bonuses(state: &mut GameState) {
    let screen_height = state.screen.height;
    for bonus in &mut state.bonuses {
        bonus.advance();
    }
    state.bonuses.retain(|b| !b.has_exited(screen_height));
}

fn collect_bonuses(state: &mut GameState) {
    let player = state.player.rect;
    let mut collected = Vec::new();

    state.bonuses.retain(|bonus| {
        if bonus_collected(bonus, &player) {
            collected.push((bonus.shape, bonus.points));
            false
        } else {
            true
        }
    });

    for (shape, points) in collected {
        state.score += points;
        state.events.push(GameEvent::BonusCollected { shape, points });
        log::debug!("Collected {:?} bonus for {} points", shape, points);
    }
}

/// Raise difficulty once per escalation interval
fn escalate(state: &mut GameState) {
    let elapsed = state.clock_ms.saturating_sub(state.last_escalation_ms);
    if elapsed <= state.tuning.escalation_interval_ms {
        return;
    }

    state.enemy_speed += 1;
    state.level += 1;
    state.errors += 1;

    let additional =
        (state.enemy_count as f64 * state.tuning.enemy_increment_percentage).floor() as u32;

    if state.level % state.tuning.count_step_levels == 0 {
        state.enemy_count += 1;
    }

    for _ in 0..additional {
        state.spawn_hazard();
    }

    state.last_escalation_ms = state.clock_ms;
    state.events.push(GameEvent::LevelUp { level: state.level });
    log::info!(
        "Level {}: hazard speed {}, +{} hazards ({} total)",
        state.level,
        state.enemy_speed,
        additional,
        state.hazards.len()
    );
}
