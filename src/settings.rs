//! Game settings
//!
//! Canvas/grid sizing supplied by the host, difficulty preset, and rule
//! toggles. Stored as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on enemy spawn speed
    pub fn enemy_speed_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }

    /// Enemies added on top of the per-level count
    pub fn extra_enemies(&self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 0,
            Difficulty::Hard => 1,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub cell_size: f32,

    // === Rules ===
    pub difficulty: Difficulty,
    /// Crossing your own trail is fatal
    pub self_trail_kills: bool,
    pub starting_lives: u8,
    pub max_lives: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            difficulty: Difficulty::Normal,
            self_trail_kills: false,
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Clamp values into a playable range
    pub fn validated(mut self) -> Self {
        if !self.cell_size.is_finite() || self.cell_size < 4.0 {
            self.cell_size = DEFAULT_CELL_SIZE;
        }
        let min_extent = self.cell_size * 5.0;
        if !self.canvas_width.is_finite() || self.canvas_width < min_extent {
            self.canvas_width = min_extent;
        }
        if !self.canvas_height.is_finite() || self.canvas_height < min_extent {
            self.canvas_height = min_extent;
        }
        self.starting_lives = self.starting_lives.max(1);
        self.max_lives = self.max_lives.max(self.starting_lives);
        self
    }

    /// Enemy count for a 1-based level: one more per level
    pub fn enemies_for_level(&self, level: u32) -> u32 {
        level.max(1) + 1 + self.difficulty.extra_enemies()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
