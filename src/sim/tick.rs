//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within
//! a tick: level-transition gating, first-tick setup, surprise update,
//! surprise collection, player, enemies, death handling, trail/claim,
//! extra lives, level completion.

use super::collision::detect_player_death;
use super::lives::LifeOutcome;
use super::state::{GameEvent, GamePhase, GameState, Keys};
use super::{claim, enemy, level, lives, player, surprise};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Direction keys currently held
    pub keys: Keys,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.emit(GameEvent::UiClick);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::UiClick);
            }
            _ => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::LevelTransition => {
            state.time_ticks += 1;
            level::advance_transition(state);
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    if !state.started {
        state.started = true;
        state.claimed.fill_border();
        state.refresh_claimed_percent();
        surprise::spawn_for_level(state);
        log::info!(
            "Level {} on a {}x{} grid, {} lives",
            state.level,
            state.grid.cols,
            state.grid.rows,
            state.lives
        );
    }

    surprise::update(state);
    surprise::collect(state);

    let grid = state.grid;
    player::step(&mut state.player, input.keys, &grid);
    enemy::step_all(state);

    if let Some(cause) = detect_player_death(state) {
        log::debug!("Player killed: {:?}", cause);
        state.player.alive = false;
        if lives::handle_death(state) == LifeOutcome::GameOver {
            state.phase = GamePhase::GameOver;
            return;
        }
    }

    claim::update_trail(state);
    lives::award_extra_lives(state);
    level::check_completion(state);
}
