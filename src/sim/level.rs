//! Level progression
//!
//! A level completes once enough of the grid is claimed. Completion pays a
//! bonus, bumps the enemy count and starts a timed transition; when it runs
//! out the board resets and fresh enemies and surprises spawn.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::heading;

/// Completion bonus for finishing `level` at `percent` claimed
pub fn level_bonus(level: u32, percent: f32) -> u64 {
    let mut bonus = LEVEL_BONUS * level as u64;
    if percent > LEVEL_EXCELLENT_PERCENT {
        bonus += LEVEL_EXCELLENT_BONUS;
    }
    bonus
}

/// Enter the transition if the level is done. Returns true if it was.
pub fn check_completion(state: &mut GameState) -> bool {
    if state.claimed_percent < LEVEL_COMPLETE_PERCENT {
        return false;
    }

    let finished = state.level;
    let bonus = level_bonus(finished, state.claimed_percent);
    state.score += bonus;
    state.level += 1;
    state.enemy_target = state.settings.enemies_for_level(state.level);
    state.phase = GamePhase::LevelTransition;
    state.transition_ticks = LEVEL_TRANSITION_TICKS;
    log::info!(
        "Level {} complete at {:.1}% (+{} bonus), next has {} enemies",
        finished,
        state.claimed_percent,
        bonus,
        state.enemy_target
    );
    state.emit(GameEvent::LevelComplete {
        level: finished,
        bonus,
    });
    true
}

/// Count down the transition; starts the next level when it ends
pub fn advance_transition(state: &mut GameState) {
    state.transition_ticks = state.transition_ticks.saturating_sub(1);
    if state.transition_ticks == 0 {
        start_level(state);
        state.phase = GamePhase::Playing;
    }
}

/// Reset the board for the current level and respawn its entities
pub fn start_level(state: &mut GameState) {
    state.reset_board();
    state.surprises.clear();
    spawn_enemies(state);
    super::surprise::spawn_for_level(state);
    log::info!("Level {} started with {} enemies", state.level, state.enemies.len());
}

/// Replace the enemy list with `enemy_target` enemies spread on rings
/// around the board center, each with a small random velocity
pub fn spawn_enemies(state: &mut GameState) {
    let grid = state.grid;
    let center = grid.center() - Vec2::splat(grid.cell_size * 0.5);
    let ring = ENEMY_SPAWN_RING_CELLS * grid.cell_size;
    let speed_scale = state.settings.difficulty.enemy_speed_scale();
    let tick = state.time_ticks;

    // Keep spawns off the border ring
    let min = Vec2::splat(grid.cell_size);
    let max = (grid.max_pos() - Vec2::splat(grid.cell_size)).max(min);

    state.enemies.clear();
    for i in 0..state.enemy_target {
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let radius = ring * (i + 1) as f32;
        let pos = (center + heading(angle) * radius).clamp(min, max);

        let direction = state.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = state.rng.random_range(ENEMY_SPAWN_SPEED_MIN..=ENEMY_SPAWN_SPEED_MAX) * speed_scale;
        let vel = heading(direction) * speed.clamp(ENEMY_MIN_SPEED, ENEMY_MAX_SPEED);

        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, vel, tick));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::Cell;

    fn nearly_done() -> GameState {
        let mut state = GameState::new(Settings::default(), 9);
        // Claim every interior row but the last few
        let cells: Vec<Cell> = state.grid.interior_cells().filter(|c| c.row < 24).collect();
        for cell in cells {
            state.claimed.insert(cell);
        }
        state.refresh_claimed_percent();
        state
    }

    #[test]
    fn test_bonus_scales_with_level() {
        assert_eq!(level_bonus(1, 80.0), LEVEL_BONUS);
        assert_eq!(level_bonus(3, 85.0), 3 * LEVEL_BONUS);
        assert_eq!(level_bonus(2, 95.0), 2 * LEVEL_BONUS + LEVEL_EXCELLENT_BONUS);
    }

    #[test]
    fn test_incomplete_level_continues() {
        let mut state = GameState::new(Settings::default(), 9);
        assert!(!check_completion(&mut state));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_completion_enters_transition() {
        let mut state = nearly_done();
        assert!(state.claimed_percent >= LEVEL_COMPLETE_PERCENT);
        assert!(check_completion(&mut state));
        assert_eq!(state.level, 2);
        assert_eq!(state.enemy_target, 3);
        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert_eq!(state.score, LEVEL_BONUS);
        assert!(state.events.contains(&GameEvent::LevelComplete {
            level: 1,
            bonus: LEVEL_BONUS
        }));
    }

    #[test]
    fn test_transition_resets_board() {
        let mut state = nearly_done();
        state.lives = 3;
        check_completion(&mut state);
        let score = state.score;

        for _ in 0..LEVEL_TRANSITION_TICKS - 1 {
            advance_transition(&mut state);
        }
        assert_eq!(state.phase, GamePhase::LevelTransition);
        advance_transition(&mut state);

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.claimed.iter().all(|c| state.grid.is_border(c)));
        assert!(state.trail.is_empty());
        assert_eq!(state.player_cell(), Cell::new(0, 0));
        assert_eq!(state.enemies.len(), 3);
        assert!(!state.surprises.is_empty());
        // Score, level and lives carry over
        assert_eq!(state.score, score);
        assert_eq!(state.level, 2);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_enemies_spawn_in_open_territory() {
        let mut state = GameState::new(Settings::default(), 9);
        state.enemy_target = 8;
        spawn_enemies(&mut state);
        assert_eq!(state.enemies.len(), 8);
        for enemy in &state.enemies {
            let cell = state.grid.cell_of_entity(enemy.pos);
            assert!(!state.grid.is_border(cell));
            let speed = enemy.vel.length();
            assert!((ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED).contains(&speed));
        }
        // Unique ids
        let mut ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
