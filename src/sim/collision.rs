//! Collision detection and response
//!
//! Reflection math shared by enemy bounces, and the per-tick check that
//! decides whether an enemy has caught the player or their trail.

use glam::Vec2;

use super::state::GameState;
use crate::consts::*;

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// An enemy touched the player
    EnemyContact,
    /// An enemy touched the trail
    TrailCut,
    /// The player crossed their own trail
    SelfCrossing,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect, scale by `boost`, then rotate by `jitter` radians
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, boost: f32, jitter: f32) -> Vec2 {
    let reflected = reflect_velocity(velocity, normal) * boost;
    if jitter == 0.0 {
        reflected
    } else {
        Vec2::from_angle(jitter).rotate(reflected)
    }
}

/// Elastic exchange of normal components between two equal masses.
///
/// `normal` points from `b` to `a`. Returns `None` when the pair is
/// already separating.
pub fn exchange_velocities(va: Vec2, vb: Vec2, normal: Vec2) -> Option<(Vec2, Vec2)> {
    let closing = (va - vb).dot(normal);
    if closing >= 0.0 {
        return None;
    }
    let an = va.dot(normal);
    let bn = vb.dot(normal);
    Some((va + (bn - an) * normal, vb + (an - bn) * normal))
}

/// Check whether an enemy has killed the player this tick.
///
/// A player standing on claimed territory is immune. Otherwise enemy
/// proximity to the player and to every trail cell are both checked.
pub fn detect_player_death(state: &GameState) -> Option<DeathCause> {
    let grid = &state.grid;
    let player_cell = state.player_cell();
    if state.claimed.contains(player_cell) {
        return None;
    }

    let player_center = grid.center_of(state.player.pos);
    let player_hit = PLAYER_HIT_RADIUS * grid.cell_size;
    let trail_hit = TRAIL_HIT_RADIUS * grid.cell_size;

    let mut cause = None;
    for enemy in &state.enemies {
        let enemy_center = grid.center_of(enemy.pos);
        if enemy_center.distance(player_center) < player_hit {
            cause = Some(DeathCause::EnemyContact);
            break;
        }
        let on_trail = state
            .trail
            .iter()
            .any(|&cell| enemy_center.distance(grid.cell_center(cell)) < trail_hit);
        if on_trail {
            cause = cause.or(Some(DeathCause::TrailCut));
        }
    }

    if cause.is_none() && state.settings.self_trail_kills {
        // The trail's last entry is the cell we just stepped from
        let crossed = state
            .trail
            .iter()
            .rev()
            .skip(1)
            .any(|&cell| cell == player_cell);
        if crossed {
            cause = Some(DeathCause::SelfCrossing);
        }
    }

    cause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::Cell;
    use proptest::prelude::*;

    fn state_with_enemy_at(pos: Vec2) -> GameState {
        let mut state = GameState::new(Settings::default(), 1);
        state.enemies.truncate(1);
        state.enemies[0].pos = pos;
        state
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_bounce_applies_boost() {
        let v = Vec2::new(2.0, 1.0);
        let n = Vec2::new(0.0, -1.0);
        let out = bounce_velocity(v, n, 1.5, 0.0);
        assert!((out - Vec2::new(3.0, -1.5)).length() < 1e-5);
        // Jitter rotates but keeps magnitude
        let jittered = bounce_velocity(v, n, 1.5, 0.1);
        assert!((jittered.length() - out.length()).abs() < 1e-4);
        assert!((jittered.angle_to(out)).abs() > 0.09);
    }

    #[test]
    fn test_exchange_head_on() {
        let normal = Vec2::new(1.0, 0.0);
        let (a, b) = exchange_velocities(Vec2::new(-2.0, 0.0), Vec2::new(1.0, 0.5), normal).unwrap();
        assert!((a - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((b - Vec2::new(-2.0, 0.5)).length() < 1e-6);
        // Separating pairs are left alone
        assert!(exchange_velocities(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), normal).is_none());
    }

    #[test]
    fn test_lethal_contact() {
        let mut state = state_with_enemy_at(Vec2::new(200.0, 200.0));
        state.player.pos = Vec2::new(205.0, 200.0);
        assert!(!state.claimed.contains(state.player_cell()));
        assert_eq!(detect_player_death(&state), Some(DeathCause::EnemyContact));
    }

    #[test]
    fn test_safe_passage_on_claimed() {
        let mut state = state_with_enemy_at(Vec2::new(200.0, 200.0));
        state.player.pos = Vec2::new(205.0, 200.0);
        let cell = state.player_cell();
        state.claimed.insert(cell);
        assert_eq!(detect_player_death(&state), None);
    }

    #[test]
    fn test_enemy_on_trail_kills_far_player() {
        let mut state = state_with_enemy_at(Vec2::new(400.0, 300.0));
        state.player.pos = Vec2::new(100.0, 100.0);
        state.trail = vec![Cell::new(5, 4), Cell::new(5, 5), Cell::new(20, 15)];
        assert_eq!(detect_player_death(&state), Some(DeathCause::TrailCut));

        state.trail.pop();
        assert_eq!(detect_player_death(&state), None);
    }

    #[test]
    fn test_self_crossing_is_configurable() {
        let mut state = state_with_enemy_at(Vec2::new(700.0, 500.0));
        state.player.pos = state.grid.cell_origin(Cell::new(5, 5));
        state.trail = vec![Cell::new(5, 5), Cell::new(6, 5), Cell::new(6, 6), Cell::new(5, 6)];
        assert_eq!(detect_player_death(&state), None);

        state.settings.self_trail_kills = true;
        assert_eq!(detect_player_death(&state), Some(DeathCause::SelfCrossing));

        // Standing on the cell we just left is not a crossing
        state.player.pos = state.grid.cell_origin(Cell::new(5, 6));
        assert_eq!(detect_player_death(&state), None);
    }

    proptest! {
        #[test]
        fn prop_reflection_law(vx in -10.0f32..10.0, vy in -10.0f32..10.0, angle in 0.0f32..std::f32::consts::TAU, boost in 1.0f32..1.5) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::from_angle(angle);
            let out = bounce_velocity(v, n, boost, 0.0);
            let expected = (v - 2.0 * v.dot(n) * n) * boost;
            prop_assert!((out - expected).length() < 1e-3);
            // Tangential component preserved, normal component flipped
            prop_assert!((out.dot(n) + v.dot(n) * boost).abs() < 1e-3);
        }
    }
}
