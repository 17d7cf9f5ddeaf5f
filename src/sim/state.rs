//! Game state and core simulation types
//!
//! `GameState` is the single aggregate every component reads and mutates.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, CellMask, Grid};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Pause between a completed level and the next
    LevelTransition,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Logical direction keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The player's marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left pixel
    pub pos: Vec2,
    pub vel: Vec2,
    pub keys: Keys,
    pub alive: bool,
}

impl Player {
    /// Player parked at the origin cell
    pub fn at_origin() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            keys: Keys::default(),
            alive: true,
        }
    }
}

/// Enemy held in place by a magnetic surprise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stuck {
    pub surprise_id: u32,
    pub ticks_left: u32,
    /// Speed restored on release
    pub saved_speed: f32,
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left pixel
    pub pos: Vec2,
    pub vel: Vec2,
    /// Speed the enemy relaxes back to after being accelerated
    pub cruise_speed: f32,
    /// Tick of the last bounce/collision boost
    pub last_accel_tick: u64,
    /// Multiplier on cruise speed, relaxes toward 1.0
    pub momentum: f32,
    pub stuck: Option<Stuck>,
    /// Velocity was overridden by a magnetic field this tick
    #[serde(default)]
    pub magnetized: bool,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, tick: u64) -> Self {
        Self {
            id,
            pos,
            vel,
            cruise_speed: vel.length().clamp(ENEMY_MIN_SPEED, ENEMY_MAX_SPEED),
            last_accel_tick: tick,
            momentum: 1.0,
            stuck: None,
            magnetized: false,
        }
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck.is_some()
    }

    /// Record a bounce/collision acceleration event
    pub fn mark_accelerated(&mut self, tick: u64, boost: f32) {
        self.last_accel_tick = tick;
        self.momentum = (self.momentum * boost).min(ENEMY_MAX_MOMENTUM);
    }
}

/// Surprise types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurpriseKind {
    /// Timed magnetic device
    TimeBomb,
}

impl SurpriseKind {
    /// Minimum clearance (cells) from trail, player, enemies and other surprises
    pub fn spawn_clearance(&self) -> f32 {
        match self {
            SurpriseKind::TimeBomb => 4.0,
        }
    }

    /// Ticks spent magnetic before exploding
    pub fn max_timer(&self) -> u32 {
        match self {
            SurpriseKind::TimeBomb => SURPRISE_MAGNETIC_TICKS,
        }
    }
}

/// Surprise lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurpriseState {
    Inactive,
    Activated,
    Magnetic,
    Exploded,
}

/// A collectible device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surprise {
    pub id: u32,
    pub kind: SurpriseKind,
    pub state: SurpriseState,
    /// Ticks spent in the current timed state
    pub timer: u32,
    pub max_timer: u32,
    /// Top-left pixel
    pub pos: Vec2,
}

impl Surprise {
    /// Progress through the magnetic phase (0-1) for rendering
    pub fn timer_ratio(&self) -> f32 {
        if self.max_timer == 0 {
            0.0
        } else {
            (self.timer as f32 / self.max_timer as f32).min(1.0)
        }
    }
}

/// Discrete notifications for audio and other listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    AreaClaimed { cells: usize },
    TrailStep,
    EnemyWallBounce,
    SurpriseCollected,
    SurpriseMagnetic,
    SurpriseExploded,
    EnemyStuck,
    LevelComplete { level: u32, bonus: u64 },
    ExtraLife,
    LifeLost,
    GameOver { score: u64 },
    UiClick,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Not persisted; a deserialized state continues from a reseeded stream
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub settings: Settings,
    pub grid: Grid,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// First playing tick has run
    pub started: bool,
    pub player: Player,
    /// Cell the player occupied at the last trail update
    pub last_player_cell: Option<Cell>,
    pub enemies: Vec<Enemy>,
    pub trail: Vec<Cell>,
    pub claimed: CellMask,
    pub claimed_percent: f32,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub enemy_target: u32,
    /// Ticks remaining in the level transition
    pub transition_ticks: u32,
    pub lives: u8,
    pub max_lives: u8,
    /// Highest extra-life score multiple already crossed
    pub life_milestone: u64,
    pub surprises: Vec<Surprise>,
    /// Events raised during the current tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given settings and seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.validated();
        let grid = Grid::new(settings.cell_size, settings.canvas_width, settings.canvas_height);
        let claimed = CellMask::with_border(grid);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid,
            time_ticks: 0,
            phase: GamePhase::Playing,
            started: false,
            player: Player::at_origin(),
            last_player_cell: Some(Cell::new(0, 0)),
            enemies: Vec::new(),
            trail: Vec::new(),
            claimed_percent: claimed.percent(),
            claimed,
            score: 0,
            level: 1,
            enemy_target: settings.enemies_for_level(1),
            transition_ticks: 0,
            lives: settings.starting_lives,
            max_lives: settings.max_lives,
            life_milestone: 0,
            surprises: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            settings,
        };

        super::level::spawn_enemies(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_cell(&self) -> Cell {
        self.grid.cell_of_entity(self.player.pos)
    }

    pub fn refresh_claimed_percent(&mut self) {
        self.claimed_percent = self.claimed.percent();
    }

    /// Return the player to the origin cell, discarding the trail
    pub fn reset_player(&mut self) {
        self.player = Player::at_origin();
        self.trail.clear();
        self.last_player_cell = Some(self.player_cell());
    }

    /// Border-only board, fresh player, no trail
    pub fn reset_board(&mut self) {
        self.claimed.reset_to_border();
        self.refresh_claimed_percent();
        self.reset_player();
    }

    /// Apply new canvas dimensions; the current level's board restarts
    pub fn resize(&mut self, cell_size: f32, canvas_width: f32, canvas_height: f32) {
        self.settings.cell_size = cell_size;
        self.settings.canvas_width = canvas_width;
        self.settings.canvas_height = canvas_height;
        self.settings = self.settings.clone().validated();
        self.grid = Grid::new(
            self.settings.cell_size,
            self.settings.canvas_width,
            self.settings.canvas_height,
        );
        self.claimed = CellMask::with_border(self.grid);
        log::info!("Resized to {}x{} cells", self.grid.cols, self.grid.rows);
        super::level::start_level(self);
    }

    /// Throw away the session and start over
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new(self.settings.clone(), seed);
    }

    /// Read-only snapshot for the renderer
    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            grid: &self.grid,
            claimed: &self.claimed,
            trail: &self.trail,
            player: &self.player,
            enemies: &self.enemies,
            surprises: &self.surprises,
            score: self.score,
            claimed_percent: self.claimed_percent,
            level: self.level,
            lives: self.lives,
            max_lives: self.max_lives,
            phase: self.phase,
        }
    }
}

/// Borrowed per-tick view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub grid: &'a Grid,
    pub claimed: &'a CellMask,
    pub trail: &'a [Cell],
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub surprises: &'a [Surprise],
    pub score: u64,
    pub claimed_percent: f32,
    pub level: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub phase: GamePhase,
}
