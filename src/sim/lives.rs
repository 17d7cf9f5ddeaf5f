//! Lives: extra-life milestones and the revive-or-game-over decision

use super::state::{GameEvent, GameState};
use crate::consts::*;

/// What happens after the player dies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    /// A life was spent and the player revived
    Continue,
    GameOver,
}

/// Grant one life for each newly crossed multiple of `EXTRA_LIFE_INTERVAL`
/// while below the cap. Crossed milestones are remembered either way.
pub fn award_extra_lives(state: &mut GameState) -> u32 {
    let milestone = state.score / EXTRA_LIFE_INTERVAL;
    let mut awarded = 0;
    while state.life_milestone < milestone {
        state.life_milestone += 1;
        if state.lives < state.max_lives {
            state.lives += 1;
            awarded += 1;
            log::info!("Extra life at {} points ({} lives)", state.score, state.lives);
            state.emit(GameEvent::ExtraLife);
        }
    }
    awarded
}

/// Spend a life, or end the game on the last one
pub fn handle_death(state: &mut GameState) -> LifeOutcome {
    if state.lives > 1 {
        state.lives -= 1;
        state.reset_player();
        log::info!("Life lost, {} remaining", state.lives);
        state.emit(GameEvent::LifeLost);
        LifeOutcome::Continue
    } else {
        state.lives = 0;
        state.player.alive = false;
        log::info!("Game over with {} points on level {}", state.score, state.level);
        state.emit(GameEvent::GameOver { score: state.score });
        LifeOutcome::GameOver
    }
}
