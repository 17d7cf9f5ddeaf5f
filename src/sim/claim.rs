//! Trail bookkeeping and claim resolution
//!
//! Off claimed territory the player lays a trail. Stepping back onto claimed
//! territory turns the trail into wall, then every enemy-free open region
//! is claimed.

use super::flood::open_regions;
use super::grid::Cell;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Result of one claim resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// Cells added to claimed territory, trail included
    pub new_cells: usize,
    /// Open regions filled
    pub regions_filled: usize,
    /// Open regions left alone because an enemy is inside
    pub regions_blocked: usize,
    pub points: u64,
}

/// Points for claiming `new_cells` in one go.
///
/// Linear per-cell points plus a power-law bonus on the total, plus a flat
/// bonus once a single capture reaches `BIG_CAPTURE_CELLS`.
pub fn claim_score(new_cells: usize) -> u64 {
    if new_cells == 0 {
        return 0;
    }
    let n = new_cells as f64;
    let base = n * POINTS_PER_CELL;
    let bonus = n.powf(CAPTURE_EXPONENT) * CAPTURE_BONUS_SCALE;
    let big = if new_cells >= BIG_CAPTURE_CELLS {
        BIG_CAPTURE_BONUS
    } else {
        0
    };
    (base + bonus).round() as u64 + big
}

/// Per-tick trail update. Returns the claim outcome when a loop closed.
///
/// Does nothing while the player stays inside the same cell.
pub fn update_trail(state: &mut GameState) -> Option<ClaimOutcome> {
    let cell = state.player_cell();
    if state.last_player_cell == Some(cell) {
        return None;
    }
    state.last_player_cell = Some(cell);

    if state.grid.is_border(cell) || state.claimed.contains(cell) {
        let outcome = if state.trail.is_empty() {
            None
        } else {
            Some(resolve_claim(state, cell))
        };
        state.trail.clear();
        return outcome;
    }

    if state.trail.last() != Some(&cell) {
        state.trail.push(cell);
        state.emit(GameEvent::TrailStep);
    }
    None
}

/// Turn the trail into wall and claim every enemy-free open region
pub fn resolve_claim(state: &mut GameState, player_cell: Cell) -> ClaimOutcome {
    let grid = state.grid;
    let before = state.claimed.len();

    for &cell in &state.trail {
        state.claimed.insert(cell);
    }
    state.claimed.insert(player_cell);

    let enemy_cells: Vec<Cell> = state
        .enemies
        .iter()
        .map(|e| grid.cell_of_entity(e.pos))
        .collect();

    let mut regions_filled = 0;
    let mut regions_blocked = 0;
    for region in open_regions(&state.claimed) {
        let occupied = region.iter().any(|c| enemy_cells.contains(c));
        if occupied {
            regions_blocked += 1;
            continue;
        }
        for cell in region {
            state.claimed.insert(cell);
        }
        regions_filled += 1;
    }

    state.refresh_claimed_percent();
    let new_cells = state.claimed.len() - before;
    let points = claim_score(new_cells);
    state.score += points;

    log::debug!(
        "Claimed {} cells ({} regions filled, {} blocked) for {} points, {:.1}% claimed",
        new_cells,
        regions_filled,
        regions_blocked,
        points,
        state.claimed_percent
    );
    if new_cells > 0 {
        state.emit(GameEvent::AreaClaimed { cells: new_cells });
    }

    ClaimOutcome {
        new_cells,
        regions_filled,
        regions_blocked,
        points,
    }
}
