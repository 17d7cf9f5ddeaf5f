//! Player kinematics
//!
//! Acceleration toward a signed max speed per held key, friction on idle
//! axes, then integrate and clamp into the canvas.

use glam::Vec2;

use super::grid::Grid;
use super::state::{Keys, Player};
use crate::consts::*;

/// Push one velocity component toward `target` (±max speed)
fn accelerate(v: f32, target: f32) -> f32 {
    let reversing = v != 0.0 && v.signum() != target.signum();
    let accel = if reversing {
        PLAYER_ACCELERATION * PLAYER_REVERSE_BOOST
    } else {
        PLAYER_ACCELERATION
    };
    if target > 0.0 {
        (v + accel).min(target)
    } else {
        (v - accel).max(target)
    }
}

fn axis(v: f32, negative: bool, positive: bool) -> f32 {
    let mut v = v;
    if negative {
        v = accelerate(v, -PLAYER_MAX_SPEED);
    }
    if positive {
        v = accelerate(v, PLAYER_MAX_SPEED);
    }
    if !negative && !positive {
        v *= PLAYER_FRICTION;
    }
    if v.abs() < PLAYER_STOP_EPSILON {
        v = 0.0;
    }
    v
}

/// Advance the player one tick
pub fn step(player: &mut Player, keys: Keys, grid: &Grid) {
    player.keys = keys;
    player.vel = Vec2::new(
        axis(player.vel.x, keys.left, keys.right),
        axis(player.vel.y, keys.up, keys.down),
    );

    let next = player.pos + player.vel;
    let clamped = grid.clamp_pos(next);
    // Stop dead against the canvas edge
    if clamped.x != next.x {
        player.vel.x = 0.0;
    }
    if clamped.y != next.y {
        player.vel.y = 0.0;
    }
    player.pos = clamped;
}
