//! Enemy kinematics
//!
//! Per enemy per tick:
//! 1. Magnetic override from active surprises replaces velocity.
//! 2. Otherwise steering: momentum decay toward cruise speed, enemy-enemy
//!    contact, far-player attraction, low-speed exploration.
//! 3. Predictive probe against claimed territory; bounce without moving.
//! 4. Integrate.
//! 5. Canvas edge bounce.
//! 6. Rescue from claimed territory if the enemy ended up inside it.
//! 7. Speed bounds.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{bounce_velocity, exchange_velocities};
use super::grid::{Cell, CellMask, Grid};
use super::state::{Enemy, GameEvent, GameState};
use super::surprise::magnetic_force;
use crate::consts::*;
use crate::{direction_to, heading};

/// What happened to the enemies during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KinematicsReport {
    pub wall_bounces: u32,
    pub territory_bounces: u32,
    pub rescues: u32,
}

/// Advance every free enemy one tick
pub fn step_all(state: &mut GameState) -> KinematicsReport {
    let mut report = KinematicsReport::default();
    let grid = state.grid;
    let now = state.time_ticks;
    let player_center = grid.center_of(state.player.pos);

    // Magnetic override first so the contact pass sees final velocities
    for enemy in state.enemies.iter_mut() {
        enemy.magnetized = false;
        if enemy.is_stuck() {
            continue;
        }
        let force = magnetic_force(&state.surprises, &grid, grid.center_of(enemy.pos));
        if force.length() > MAGNET_MIN_FORCE {
            enemy.vel = (force * MAGNET_VELOCITY_SCALE).clamp_length_max(MAGNET_MAX_SPEED);
            enemy.magnetized = true;
        }
    }

    for enemy in state.enemies.iter_mut() {
        if enemy.is_stuck() || enemy.magnetized {
            continue;
        }
        relax_toward_cruise(enemy, now);
    }

    resolve_enemy_contacts(&mut state.enemies, &grid, now);

    for enemy in state.enemies.iter_mut() {
        if enemy.is_stuck() || enemy.magnetized {
            continue;
        }
        steer(enemy, &grid, player_center, &mut state.rng);
    }

    for enemy in state.enemies.iter_mut() {
        if enemy.is_stuck() {
            continue;
        }
        if probe_territory(enemy, &grid, &state.claimed, now, &mut state.rng) {
            report.territory_bounces += 1;
        } else {
            enemy.pos += enemy.vel;
        }
        if bounce_off_walls(enemy, &grid, now) {
            report.wall_bounces += 1;
        }
        if rescue_from_territory(enemy, &grid, &state.claimed) {
            report.rescues += 1;
        }
        let ceiling = if enemy.magnetized {
            MAGNET_MAX_SPEED
        } else {
            ENEMY_MAX_SPEED
        };
        enemy.vel = enforce_speed(enemy.vel, ENEMY_MIN_SPEED, ceiling, &mut state.rng);
    }

    for _ in 0..report.wall_bounces {
        state.emit(GameEvent::EnemyWallBounce);
    }
    report
}

/// After the cooldown, ease speed back toward cruise * momentum
fn relax_toward_cruise(enemy: &mut Enemy, now: u64) {
    if now.saturating_sub(enemy.last_accel_tick) < ENEMY_ACCEL_COOLDOWN_TICKS {
        return;
    }
    enemy.momentum = 1.0 + (enemy.momentum - 1.0) * ENEMY_MOMENTUM_DECAY;
    let speed = enemy.vel.length();
    if speed <= f32::EPSILON {
        return;
    }
    let target = enemy.cruise_speed * enemy.momentum;
    let new_speed = speed + (target - speed) * ENEMY_VELOCITY_DECAY;
    enemy.vel *= new_speed / speed;
}

/// Bounce apart free enemies that touch while closing on each other.
/// Stuck and magnetized enemies take no part.
fn resolve_enemy_contacts(enemies: &mut [Enemy], grid: &Grid, now: u64) {
    let contact = ENEMY_CONTACT_RADIUS * grid.cell_size;
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.is_stuck() || a.magnetized {
            continue;
        }
        for b in tail.iter_mut() {
            if b.is_stuck() || b.magnetized {
                continue;
            }
            let delta = a.pos - b.pos;
            let dist = delta.length();
            // Coincident centers have no contact normal
            if dist >= contact || dist <= f32::EPSILON {
                continue;
            }
            let normal = delta / dist;
            if let Some((va, vb)) = exchange_velocities(a.vel, b.vel, normal) {
                a.vel = va * ENEMY_COLLISION_BOOST;
                b.vel = vb * ENEMY_COLLISION_BOOST;
                a.mark_accelerated(now, ENEMY_COLLISION_BOOST);
                b.mark_accelerated(now, ENEMY_COLLISION_BOOST);
            }
        }
    }
}

/// Far-player attraction and low-speed exploration
fn steer(enemy: &mut Enemy, grid: &Grid, player_center: Vec2, rng: &mut Pcg32) {
    let center = grid.center_of(enemy.pos);
    let speed = enemy.vel.length();

    let far = ENEMY_ATTRACT_DISTANCE_CELLS * grid.cell_size;
    if speed < ENEMY_ATTRACT_SLOW_SPEED && center.distance(player_center) > far {
        if let Some(dir) = direction_to(center, player_center) {
            enemy.vel += dir * ENEMY_ATTRACT_STRENGTH;
        }
    }

    if speed < ENEMY_EXPLORE_SPEED {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        enemy.vel += heading(angle) * ENEMY_EXPLORE_STRENGTH;
    }
}

/// Claimed non-border cell under a pixel
fn hits_territory(grid: &Grid, claimed: &CellMask, point: Vec2) -> Option<Cell> {
    let cell = grid.cell_of(point);
    (grid.in_bounds(cell) && !grid.is_border(cell) && claimed.contains(cell)).then_some(cell)
}

/// Contact normal for the projected position.
///
/// Sample the projected center and four points one probe radius out along
/// each axis. Returns `None` when nothing lands in claimed territory.
pub fn territory_normal(grid: &Grid, claimed: &CellMask, center: Vec2, vel: Vec2) -> Option<Vec2> {
    let next = center + vel;
    let r = ENEMY_PROBE_RADIUS * grid.cell_size;
    let probes = [
        (Vec2::new(r, 0.0), Vec2::new(-1.0, 0.0)),
        (Vec2::new(-r, 0.0), Vec2::new(1.0, 0.0)),
        (Vec2::new(0.0, r), Vec2::new(0.0, -1.0)),
        (Vec2::new(0.0, -r), Vec2::new(0.0, 1.0)),
    ];

    let mut hit = false;
    let mut normal = Vec2::ZERO;
    for (offset, n) in probes {
        if hits_territory(grid, claimed, next + offset).is_some() {
            hit = true;
            normal += n;
        }
    }
    if let Some(cell) = hits_territory(grid, claimed, next) {
        hit = true;
        // Push out along the dominant axis away from the cell center
        let away = center - grid.cell_center(cell);
        normal += if away.x.abs() >= away.y.abs() {
            Vec2::new(away.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, away.y.signum())
        };
    }

    if !hit {
        return None;
    }
    // Opposing probes cancel in a corridor; fall back to reversing
    Some(
        normal
            .try_normalize()
            .unwrap_or_else(|| -vel.normalize_or_zero()),
    )
}

/// Bounce off claimed territory before moving. Returns true if it fired.
fn probe_territory(
    enemy: &mut Enemy,
    grid: &Grid,
    claimed: &CellMask,
    now: u64,
    rng: &mut Pcg32,
) -> bool {
    let center = grid.center_of(enemy.pos);
    let Some(normal) = territory_normal(grid, claimed, center, enemy.vel) else {
        return false;
    };
    let jitter = rng.random_range(-ENEMY_BOUNCE_JITTER..=ENEMY_BOUNCE_JITTER);
    enemy.vel = bounce_velocity(enemy.vel, normal, ENEMY_BOUNCE_BOOST, jitter);
    enemy.mark_accelerated(now, ENEMY_BOUNCE_BOOST);
    true
}

/// Clamp to the canvas, reflecting damped velocity with a boost
fn bounce_off_walls(enemy: &mut Enemy, grid: &Grid, now: u64) -> bool {
    let max = grid.max_pos();
    let mut bounced = false;

    if enemy.pos.x < 0.0 || enemy.pos.x > max.x {
        enemy.pos.x = enemy.pos.x.clamp(0.0, max.x);
        enemy.vel.x = -enemy.vel.x * ENEMY_WALL_DAMPING;
        bounced = true;
    }
    if enemy.pos.y < 0.0 || enemy.pos.y > max.y {
        enemy.pos.y = enemy.pos.y.clamp(0.0, max.y);
        enemy.vel.y = -enemy.vel.y * ENEMY_WALL_DAMPING;
        bounced = true;
    }

    if bounced {
        enemy.vel *= ENEMY_WALL_BOOST;
        enemy.mark_accelerated(now, ENEMY_WALL_BOOST);
    }
    bounced
}

/// Nearest unclaimed cell within the escape radius, searching outward ring by ring
pub fn nearest_open_cell(grid: &Grid, claimed: &CellMask, from: Cell) -> Option<Cell> {
    for r in 1..=ENEMY_ESCAPE_SEARCH_RADIUS {
        let mut best: Option<(i32, Cell)> = None;
        for dr in -r..=r {
            for dc in -r..=r {
                if dc.abs().max(dr.abs()) != r {
                    continue;
                }
                let cell = Cell::new(from.col + dc, from.row + dr);
                if !grid.in_bounds(cell) || claimed.contains(cell) {
                    continue;
                }
                let d2 = dc * dc + dr * dr;
                if best.is_none_or(|(bd, _)| d2 < bd) {
                    best = Some((d2, cell));
                }
            }
        }
        if let Some((_, cell)) = best {
            return Some(cell);
        }
    }
    None
}

/// Pull an enemy out of claimed territory. Returns true if it was moved.
fn rescue_from_territory(enemy: &mut Enemy, grid: &Grid, claimed: &CellMask) -> bool {
    let cell = grid.cell_of_entity(enemy.pos);
    if grid.is_border(cell) || !claimed.contains(cell) {
        return false;
    }
    let Some(open) = nearest_open_cell(grid, claimed, cell) else {
        log::warn!("Enemy {} stuck in claimed cell {:?} with no escape", enemy.id, cell);
        return false;
    };

    log::warn!("Enemy {} rescued from claimed cell {:?} to {:?}", enemy.id, cell, open);
    let escape = direction_to(grid.cell_center(cell), grid.cell_center(open)).unwrap_or(Vec2::X);
    enemy.pos = grid.cell_origin(open);
    enemy.vel = escape * enemy.vel.length().max(enemy.cruise_speed);
    true
}

/// Clamp speed into [min, max]; a dead stop picks a random heading
pub fn enforce_speed(vel: Vec2, min: f32, max: f32, rng: &mut Pcg32) -> Vec2 {
    let speed = vel.length();
    if speed <= f32::EPSILON {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        return heading(angle) * min;
    }
    if speed < min {
        vel * (min / speed)
    } else if speed > max {
        vel * (max / speed)
    } else {
        vel
    }
}
