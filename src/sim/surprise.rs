//! Surprises: collectible magnetic time bombs
//!
//! Lifecycle: Inactive -> (collected) -> Activated -> (short delay) ->
//! Magnetic -> (timer expires) -> Exploded (removed). While magnetic a
//! device pulls enemies in and sticks any that touch it.

use glam::Vec2;
use rand::Rng;

use super::grid::{Cell, Grid};
use super::state::{GameEvent, GameState, Stuck, Surprise, SurpriseKind, SurpriseState};
use crate::consts::*;
use crate::{direction_to, heading};

/// Number of devices for a 1-based level (1-3)
pub fn surprises_for_level(level: u32) -> u32 {
    (1 + level.saturating_sub(1) / 2).min(SURPRISE_MAX_PER_LEVEL)
}

/// Pick a spawn cell by rejection sampling, or `None` when the budget runs out
pub fn find_spawn_cell(state: &mut GameState, kind: SurpriseKind) -> Option<Cell> {
    let grid = state.grid;
    let lo = SURPRISE_BORDER_INSET;
    let hi_col = grid.cols - 1 - SURPRISE_BORDER_INSET;
    let hi_row = grid.rows - 1 - SURPRISE_BORDER_INSET;
    if hi_col < lo || hi_row < lo {
        return None;
    }

    let clearance = kind.spawn_clearance();
    let player_cell = state.player_cell();
    for _ in 0..SURPRISE_SPAWN_ATTEMPTS {
        let cell = Cell::new(
            state.rng.random_range(lo..=hi_col),
            state.rng.random_range(lo..=hi_row),
        );
        if state.claimed.contains(cell) {
            continue;
        }
        let too_close = |other: Cell| cell.distance(other) < clearance;
        if too_close(player_cell)
            || state.trail.iter().any(|&c| too_close(c))
            || state.enemies.iter().any(|e| too_close(grid.cell_of_entity(e.pos)))
            || state.surprises.iter().any(|s| too_close(grid.cell_of_entity(s.pos)))
        {
            continue;
        }
        return Some(cell);
    }
    None
}

/// Place the level's devices; slots with no valid cell are skipped
pub fn spawn_for_level(state: &mut GameState) {
    let kind = SurpriseKind::TimeBomb;
    let count = surprises_for_level(state.level);
    for _ in 0..count {
        let Some(cell) = find_spawn_cell(state, kind) else {
            log::debug!("No room for a surprise on level {}", state.level);
            continue;
        };
        let id = state.next_entity_id();
        let pos = state.grid.cell_origin(cell);
        state.surprises.push(Surprise {
            id,
            kind,
            state: SurpriseState::Inactive,
            timer: 0,
            max_timer: kind.max_timer(),
            pos,
        });
    }
}

/// Attraction toward every magnetic device within range.
///
/// Force per device is `MAGNET_STRENGTH / distance_in_cells` toward the
/// device. Zero distance contributes nothing.
pub fn magnetic_force(surprises: &[Surprise], grid: &Grid, at: Vec2) -> Vec2 {
    let range = MAGNET_RANGE_CELLS * grid.cell_size;
    surprises
        .iter()
        .filter(|s| s.state == SurpriseState::Magnetic)
        .filter_map(|s| {
            let center = grid.center_of(s.pos);
            let dist = at.distance(center);
            if dist >= range {
                return None;
            }
            let dir = direction_to(at, center)?;
            Some(dir * (MAGNET_STRENGTH / (dist / grid.cell_size)))
        })
        .fold(Vec2::ZERO, |acc, f| acc + f)
}

/// Advance device timers, stick enemies to magnetic devices, release
/// enemies whose hold expired, and remove exploded devices.
pub fn update(state: &mut GameState) {
    let grid = state.grid;
    let mut exploded = Vec::new();

    for surprise in state.surprises.iter_mut() {
        match surprise.state {
            SurpriseState::Inactive | SurpriseState::Exploded => {}
            SurpriseState::Activated => {
                surprise.timer += 1;
                if surprise.timer >= SURPRISE_ACTIVATION_TICKS {
                    surprise.state = SurpriseState::Magnetic;
                    surprise.timer = 0;
                    log::debug!("Surprise {} is magnetic", surprise.id);
                    state.events.push(GameEvent::SurpriseMagnetic);
                }
            }
            SurpriseState::Magnetic => {
                surprise.timer += 1;
                if surprise.timer >= surprise.max_timer {
                    surprise.state = SurpriseState::Exploded;
                    log::debug!("Surprise {} exploded", surprise.id);
                    exploded.push(surprise.id);
                    state.events.push(GameEvent::SurpriseExploded);
                }
            }
        }
    }

    for id in &exploded {
        release_all(state, *id);
    }
    state.surprises.retain(|s| s.state != SurpriseState::Exploded);

    // Stick enemies touching a magnetic device
    let stick_radius = SURPRISE_STICK_RADIUS * grid.cell_size;
    for surprise in &state.surprises {
        if surprise.state != SurpriseState::Magnetic {
            continue;
        }
        let center = grid.center_of(surprise.pos);
        for enemy in state.enemies.iter_mut() {
            if enemy.is_stuck() {
                continue;
            }
            let enemy_center = grid.center_of(enemy.pos);
            if enemy_center.distance(center) >= stick_radius {
                continue;
            }
            let side = direction_to(center, enemy_center).unwrap_or(Vec2::X);
            enemy.stuck = Some(Stuck {
                surprise_id: surprise.id,
                ticks_left: SURPRISE_STICK_TICKS,
                saved_speed: enemy.vel.length().max(ENEMY_MIN_SPEED),
            });
            enemy.vel = Vec2::ZERO;
            enemy.magnetized = false;
            enemy.pos = grid.clamp_pos(surprise.pos + side * grid.cell_size);
            state.score += SURPRISE_STICK_BONUS;
            state.events.push(GameEvent::EnemyStuck);
        }
    }

    // Count down held enemies
    for enemy in state.enemies.iter_mut() {
        let Some(stuck) = enemy.stuck.as_mut() else {
            continue;
        };
        stuck.ticks_left = stuck.ticks_left.saturating_sub(1);
        if stuck.ticks_left == 0 {
            let speed = stuck.saved_speed;
            enemy.stuck = None;
            let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
            enemy.vel = heading(angle) * speed;
        }
    }
}

/// Free every enemy held by a device
fn release_all(state: &mut GameState, surprise_id: u32) {
    for enemy in state.enemies.iter_mut() {
        let Some(stuck) = enemy.stuck else { continue };
        if stuck.surprise_id != surprise_id {
            continue;
        }
        enemy.stuck = None;
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        enemy.vel = heading(angle) * stuck.saved_speed;
    }
}

/// Player picks up any inactive device within reach
pub fn collect(state: &mut GameState) {
    let grid = state.grid;
    let player_center = grid.center_of(state.player.pos);
    let reach = SURPRISE_COLLECT_RADIUS * grid.cell_size;
    let bonus = SURPRISE_COLLECT_BONUS * state.level as u64;

    let mut collected = 0;
    for surprise in state.surprises.iter_mut() {
        if surprise.state != SurpriseState::Inactive {
            continue;
        }
        if grid.center_of(surprise.pos).distance(player_center) < reach {
            surprise.state = SurpriseState::Activated;
            surprise.timer = 0;
            collected += 1;
            log::debug!("Surprise {} collected", surprise.id);
        }
    }

    for _ in 0..collected {
        state.score += bonus;
        state.emit(GameEvent::SurpriseCollected);
    }
}
