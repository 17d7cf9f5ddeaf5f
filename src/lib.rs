//! Xonix - A territory claiming arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, flood fill, physics, claiming, game state)
//! - `settings`: Canvas/grid configuration and rule toggles
//! - `highscores`: Persisted leaderboard consulted at game over

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// All speeds and distances are per tick. The simulation assumes a fixed
/// timestep and never scales these by measured frame time.
pub mod consts {
    /// Logical tick rate the driver is expected to run at
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default canvas (40 x 30 cells of 20px)
    pub const DEFAULT_CELL_SIZE: f32 = 20.0;
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

    // === Player ===
    pub const PLAYER_MAX_SPEED: f32 = 4.0;
    pub const PLAYER_ACCELERATION: f32 = 0.8;
    /// Extra acceleration while reversing along an axis
    pub const PLAYER_REVERSE_BOOST: f32 = 1.8;
    pub const PLAYER_FRICTION: f32 = 0.8;
    pub const PLAYER_STOP_EPSILON: f32 = 0.05;

    // === Enemies ===
    pub const ENEMY_MIN_SPEED: f32 = 1.0;
    pub const ENEMY_MAX_SPEED: f32 = 5.0;
    /// Initial cruise speed range at spawn
    pub const ENEMY_SPAWN_SPEED_MIN: f32 = 1.5;
    pub const ENEMY_SPAWN_SPEED_MAX: f32 = 2.5;
    /// Ticks after an acceleration event before speed relaxes toward cruise
    pub const ENEMY_ACCEL_COOLDOWN_TICKS: u64 = 90;
    /// Fraction of the gap to cruise speed closed each tick once cooled down
    pub const ENEMY_VELOCITY_DECAY: f32 = 0.03;
    /// Per-tick relaxation of the momentum multiplier toward 1.0
    pub const ENEMY_MOMENTUM_DECAY: f32 = 0.98;
    pub const ENEMY_MAX_MOMENTUM: f32 = 1.8;
    /// Multiplier applied on territory bounces
    pub const ENEMY_BOUNCE_BOOST: f32 = 1.05;
    /// Max random rotation (radians) added to a territory bounce
    pub const ENEMY_BOUNCE_JITTER: f32 = 0.15;
    /// Velocity damping and boost on canvas edge contact
    pub const ENEMY_WALL_DAMPING: f32 = 0.95;
    pub const ENEMY_WALL_BOOST: f32 = 1.08;
    /// Enemy-enemy contact distance (fraction of cell size)
    pub const ENEMY_CONTACT_RADIUS: f32 = 0.9;
    pub const ENEMY_COLLISION_BOOST: f32 = 1.1;
    /// Effective radius for predictive sampling (fraction of cell size)
    pub const ENEMY_PROBE_RADIUS: f32 = 0.4;
    /// Player attraction kicks in beyond this many cells when slow
    pub const ENEMY_ATTRACT_DISTANCE_CELLS: f32 = 10.0;
    pub const ENEMY_ATTRACT_SLOW_SPEED: f32 = 1.5;
    pub const ENEMY_ATTRACT_STRENGTH: f32 = 0.05;
    /// Random perturbation applied below this speed
    pub const ENEMY_EXPLORE_SPEED: f32 = 1.3;
    pub const ENEMY_EXPLORE_STRENGTH: f32 = 0.15;
    /// Ring radius (cells) searched when rescuing an enemy stuck in claimed territory
    pub const ENEMY_ESCAPE_SEARCH_RADIUS: i32 = 6;
    /// Spacing (cells) between spawn rings around the board center
    pub const ENEMY_SPAWN_RING_CELLS: f32 = 2.0;

    // === Collision ===
    /// Enemy-to-player lethal distance (fraction of cell size)
    pub const PLAYER_HIT_RADIUS: f32 = 0.75;
    /// Enemy-to-trail-cell lethal distance (fraction of cell size)
    pub const TRAIL_HIT_RADIUS: f32 = 0.6;

    // === Scoring ===
    pub const POINTS_PER_CELL: f64 = 10.0;
    /// Power-law exponent on newly claimed cell count
    pub const CAPTURE_EXPONENT: f64 = 1.5;
    pub const CAPTURE_BONUS_SCALE: f64 = 0.5;
    /// Single-capture size that earns the flat bonus
    pub const BIG_CAPTURE_CELLS: usize = 100;
    pub const BIG_CAPTURE_BONUS: u64 = 500;

    // === Levels ===
    pub const LEVEL_COMPLETE_PERCENT: f32 = 80.0;
    pub const LEVEL_EXCELLENT_PERCENT: f32 = 90.0;
    pub const LEVEL_BONUS: u64 = 1000;
    pub const LEVEL_EXCELLENT_BONUS: u64 = 2500;
    /// Level transition pause (2 seconds)
    pub const LEVEL_TRANSITION_TICKS: u32 = 2 * TICKS_PER_SECOND;

    // === Lives ===
    pub const STARTING_LIVES: u8 = 2;
    pub const MAX_LIVES: u8 = 5;
    pub const EXTRA_LIFE_INTERVAL: u64 = 10_000;

    // === Surprises ===
    pub const SURPRISE_MAX_PER_LEVEL: u32 = 3;
    /// Cells kept clear between the border and a spawned surprise
    pub const SURPRISE_BORDER_INSET: i32 = 2;
    pub const SURPRISE_SPAWN_ATTEMPTS: u32 = 100;
    /// Player pickup distance (fraction of cell size)
    pub const SURPRISE_COLLECT_RADIUS: f32 = 0.8;
    /// Delay between collection and the magnetic phase
    pub const SURPRISE_ACTIVATION_TICKS: u32 = TICKS_PER_SECOND / 2;
    /// Magnetic phase length before the device explodes
    pub const SURPRISE_MAGNETIC_TICKS: u32 = 5 * TICKS_PER_SECOND;
    pub const SURPRISE_COLLECT_BONUS: u64 = 200;
    pub const SURPRISE_STICK_BONUS: u64 = 50;
    /// Enemy contact distance that sticks it to a magnetic device (fraction of cell size)
    pub const SURPRISE_STICK_RADIUS: f32 = 1.0;
    pub const SURPRISE_STICK_TICKS: u32 = 2 * TICKS_PER_SECOND;

    // === Magnetic field ===
    /// Force = MAGNET_STRENGTH / distance (cells), toward the device, within range
    pub const MAGNET_STRENGTH: f32 = 2.0;
    pub const MAGNET_RANGE_CELLS: f32 = 10.0;
    /// Force magnitude below which the field is ignored
    pub const MAGNET_MIN_FORCE: f32 = 0.05;
    /// Velocity = force * multiplier, capped at the elevated ceiling
    pub const MAGNET_VELOCITY_SCALE: f32 = 3.0;
    pub const MAGNET_MAX_SPEED: f32 = 7.0;
}

/// Direction from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        None
    } else {
        Some(delta / dist)
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
