//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod claim;
pub mod collision;
pub mod enemy;
pub mod flood;
pub mod grid;
pub mod level;
pub mod lives;
pub mod player;
pub mod state;
pub mod surprise;
pub mod tick;

pub use claim::{ClaimOutcome, claim_score};
pub use collision::{DeathCause, detect_player_death};
pub use enemy::KinematicsReport;
pub use flood::{flood_region, open_regions};
pub use grid::{Cell, CellMask, Grid};
pub use lives::LifeOutcome;
pub use state::{
    Enemy, GameEvent, GamePhase, GameState, Keys, Player, RenderView, Surprise, SurpriseKind,
    SurpriseState,
};
pub use tick::{TickInput, tick};
