//! Xonix headless driver
//!
//! Runs the simulation at a fixed timestep with a simple autopilot that
//! carves rectangular loops off the top border. Useful for soak runs and
//! for watching the event stream in the log.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use xonix::highscores::{self, HighScores};
use xonix::settings::{Difficulty, Settings};
use xonix::sim::{Cell, GameEvent, GamePhase, GameState, Keys, TickInput, tick};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum ticks to simulate
    #[arg(long, default_value_t = 60 * 60 * 5)]
    ticks: u64,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Override the difficulty preset (easy, normal, hard)
    #[arg(long)]
    difficulty: Option<String>,
    /// High score file consulted at game over
    #[arg(long, default_value = "xonix_scores.json")]
    scores: PathBuf,
}

/// Pixels the player center may be off a waypoint center and still count as there
const WAYPOINT_SLACK: f32 = 3.0;

/// Steers the player around rectangles hanging off the top border
struct Autopilot {
    column: i32,
    depth: i32,
    width: i32,
    waypoints: Vec<Cell>,
    next: usize,
}

impl Autopilot {
    fn new() -> Self {
        let mut pilot = Self {
            column: 1,
            depth: 4,
            width: 4,
            waypoints: Vec::new(),
            next: 0,
        };
        pilot.plan_loop();
        pilot
    }

    /// Route along the border to the loop start, then down, across and back up
    fn plan_loop(&mut self) {
        let left = self.column;
        let right = self.column + self.width;
        self.waypoints = vec![
            Cell::new(left, 0),
            Cell::new(left, self.depth),
            Cell::new(right, self.depth),
            Cell::new(right, 0),
        ];
        self.next = 0;
    }

    /// Start over from the origin corner, e.g. after a death or a new level
    fn reset(&mut self) {
        self.column = 1;
        self.plan_loop();
    }

    fn advance(&mut self, state: &GameState) {
        self.next += 1;
        if self.next < self.waypoints.len() {
            return;
        }
        let max_col = state.grid.cols - 2;
        self.column += self.width;
        if self.column + self.width > max_col {
            self.column = 1;
            self.depth = (self.depth + 3).min(state.grid.rows - 3);
        }
        self.plan_loop();
    }

    fn keys(&mut self, state: &GameState) -> Keys {
        let Some(&target) = self.waypoints.get(self.next) else {
            return Keys::default();
        };

        let here = state.grid.center_of(state.player.pos);
        let delta = state.grid.cell_center(target) - here;
        if delta.abs().max_element() <= WAYPOINT_SLACK {
            self.advance(state);
            return Keys::default();
        }

        steer(delta)
    }
}

/// One axis at a time, so the trail stays rectangular
fn steer(delta: Vec2) -> Keys {
    let mut keys = Keys::default();
    if delta.x.abs() > WAYPOINT_SLACK {
        keys.left = delta.x < 0.0;
        keys.right = delta.x > 0.0;
    } else {
        keys.up = delta.y < 0.0;
        keys.down = delta.y > 0.0;
    }
    keys
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = cli
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    if let Some(name) = cli.difficulty.as_deref() {
        match Difficulty::parse(name) {
            Some(difficulty) => settings.difficulty = difficulty,
            None => log::warn!("Unknown difficulty '{}', keeping {}", name, settings.difficulty.as_str()),
        }
    }

    let seed = cli.seed.unwrap_or_else(highscores::now_ms);
    log::info!("Xonix starting (seed {}, {} difficulty)", seed, settings.difficulty.as_str());

    let mut state = GameState::new(settings, seed);
    let mut pilot = Autopilot::new();

    while state.time_ticks < cli.ticks {
        let input = TickInput {
            keys: pilot.keys(&state),
            pause: false,
        };
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::AreaClaimed { cells } => {
                    log::info!(
                        "Claimed {} cells, {:.1}% of the board, score {}",
                        cells,
                        state.claimed_percent,
                        state.score
                    );
                }
                GameEvent::LifeLost | GameEvent::LevelComplete { .. } => pilot.reset(),
                GameEvent::TrailStep | GameEvent::EnemyWallBounce => {}
                other => log::debug!("{:?}", other),
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: score {}, level {}, {:.1}% claimed",
        state.time_ticks,
        state.score,
        state.level,
        state.claimed_percent
    );

    if state.phase != GamePhase::GameOver {
        return;
    }

    let mut scores = HighScores::load_from(&cli.scores);
    match record_high_score(&mut scores, &state, highscores::now_ms()) {
        Some(rank) => {
            log::info!("New high score, rank {}", rank);
            if let Err(err) = scores.save_to(&cli.scores) {
                log::error!("Failed to save high scores to {}: {}", cli.scores.display(), err);
            }
        }
        None => log::info!(
            "No high score this time (best is {})",
            scores.top_score().unwrap_or(0)
        ),
    }
}

/// Enter a finished game on the leaderboard if it earns a place
fn record_high_score(scores: &mut HighScores, state: &GameState, timestamp: u64) -> Option<usize> {
    if !scores.qualifies(state.score) {
        return None;
    }
    let rank = scores.potential_rank(state.score);
    log::debug!("Score {} qualifies for rank {:?}", state.score, rank);
    scores.add_score(state.score, state.level, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_high_score() {
        let mut scores = HighScores::new();
        let mut state = GameState::new(Settings::default(), 1);

        // Zero never makes the table
        assert_eq!(record_high_score(&mut scores, &state, 10), None);
        assert!(scores.is_empty());

        state.score = 500;
        state.level = 2;
        assert_eq!(record_high_score(&mut scores, &state, 11), Some(1));
        assert_eq!(scores.entries[0].level, 2);
        assert_eq!(scores.entries[0].timestamp, 11);

        state.score = 300;
        assert_eq!(record_high_score(&mut scores, &state, 12), Some(2));
    }

    #[test]
    fn test_steer_one_axis_at_a_time() {
        let keys = steer(Vec2::new(40.0, 40.0));
        assert!(keys.right && !keys.down);
        let keys = steer(Vec2::new(1.0, -40.0));
        assert!(keys.up && !keys.left && !keys.right);
    }
}
