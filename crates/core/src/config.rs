//! Game configuration
//!
//! Every tunable of a game lives here and is handed to [`crate::GameState::new`].
//! Invalid values are never fatal: [`GameConfig::validated`] logs them and clamps
//! to a safe value so a bad config file still yields a playable game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::*;

/// Errors from loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    /// Starting difficulty, also the floor difficulty can never drop below
    pub initial_difficulty: f64,
    pub difficulty_increment_on_plane_clear: f64,
    pub difficulty_increment_on_piece_placed: f64,
    pub score_on_plane_clear_factor: f64,
    pub score_on_piece_placed_factor: f64,
    /// Pointer travel per drag rotation
    pub drag_sensitivity: f32,
    /// Lifetime of blocks knocked out by a plane clear (0 = remove immediately)
    pub block_break_secs: f32,
    /// Simulation time scale while paused
    pub pause_time_scale: f32,
    /// Pieces the generator draws from, uniformly
    pub piece_set: Vec<PieceKind>,
    /// Where the upcoming piece is staged for display
    pub next_piece_position: Vec3,
    /// Entries kept on the high-score table
    pub scoreboard_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
            depth: DEFAULT_FIELD_DEPTH,
            initial_difficulty: DEFAULT_INITIAL_DIFFICULTY,
            difficulty_increment_on_plane_clear: DIFFICULTY_INCREMENT_ON_PLANE_CLEAR,
            difficulty_increment_on_piece_placed: DIFFICULTY_INCREMENT_ON_PIECE_PLACED,
            score_on_plane_clear_factor: SCORE_ON_PLANE_CLEAR_FACTOR,
            score_on_piece_placed_factor: SCORE_ON_PIECE_PLACED_FACTOR,
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
            block_break_secs: BLOCK_BREAK_SECS,
            pause_time_scale: PAUSE_TIME_SCALE,
            piece_set: PieceKind::ALL.to_vec(),
            next_piece_position: Vec3::new(-4.0, DEFAULT_FIELD_HEIGHT as f32 - 4.0, -4.0),
            scoreboard_capacity: DEFAULT_SCOREBOARD_CAPACITY,
        }
    }
}

fn field_extent(name: &str, value: i32) -> i32 {
    if value < 1 {
        warn!(field = name, value, "must be greater than 0, using 1");
        1
    } else if value > MAX_FIELD_EXTENT {
        warn!(field = name, value, max = MAX_FIELD_EXTENT, "field too large, clamping");
        MAX_FIELD_EXTENT
    } else {
        value
    }
}

fn non_negative(name: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(field = name, value, "must be a non-negative number, using 0");
        0.0
    }
}

impl GameConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp every out-of-range value to a safe one, logging each fix
    pub fn validated(mut self) -> Self {
        self.width = field_extent("width", self.width);
        self.height = field_extent("height", self.height);
        self.depth = field_extent("depth", self.depth);

        if !(self.initial_difficulty.is_finite() && self.initial_difficulty > 0.0) {
            warn!(
                value = self.initial_difficulty,
                "initial_difficulty must be greater than 0, using 1"
            );
            self.initial_difficulty = 1.0;
        }

        self.difficulty_increment_on_plane_clear = non_negative(
            "difficulty_increment_on_plane_clear",
            self.difficulty_increment_on_plane_clear,
        );
        self.difficulty_increment_on_piece_placed = non_negative(
            "difficulty_increment_on_piece_placed",
            self.difficulty_increment_on_piece_placed,
        );
        self.score_on_plane_clear_factor =
            non_negative("score_on_plane_clear_factor", self.score_on_plane_clear_factor);
        self.score_on_piece_placed_factor =
            non_negative("score_on_piece_placed_factor", self.score_on_piece_placed_factor);

        if !(self.drag_sensitivity.is_finite() && self.drag_sensitivity > 0.0) {
            warn!(value = self.drag_sensitivity, "drag_sensitivity must be greater than 0, using 1");
            self.drag_sensitivity = 1.0;
        }

        if !(self.block_break_secs.is_finite() && self.block_break_secs >= 0.0) {
            warn!(value = self.block_break_secs, "block_break_secs must be non-negative, using 0");
            self.block_break_secs = 0.0;
        }

        if !(0.0..=1.0).contains(&self.pause_time_scale) {
            let clamped = if self.pause_time_scale > 1.0 { 1.0 } else { 0.0 };
            warn!(
                value = self.pause_time_scale,
                clamped, "pause_time_scale must be within 0..=1"
            );
            self.pause_time_scale = clamped;
        }

        if self.piece_set.is_empty() {
            warn!("piece_set is empty, using every piece kind");
            self.piece_set = PieceKind::ALL.to_vec();
        }

        if self.scoreboard_capacity < 1 {
            warn!("scoreboard_capacity must be greater than 0, using 1");
            self.scoreboard_capacity = 1;
        }

        self
    }
}
