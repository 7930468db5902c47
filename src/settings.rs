//! Game settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! built-in defaults. Validation enforces the limits the grid mover relies on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::grid::{Cell, Grid, GridError};
use crate::tiles_per_sec_to_step;

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid layout: {0}")]
    Layout(#[from] GridError),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("spawn cell ({}, {}) is a wall or outside the maze", .0.col, .0.row)]
    BadSpawn(Cell),
    #[error("maze has no open cell to spawn the player")]
    NoOpenCell,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pixels per maze cell
    pub tile_size: f32,
    /// Update rate (steps per second)
    pub fps: u32,

    // === Actors ===
    /// Player speed in tiles per second
    pub player_speed: f32,
    /// Ghost speed in tiles per second
    pub ghost_speed: f32,
    /// Actor radius in pixels (default: half a tile minus a small margin)
    pub actor_radius: Option<f32>,

    // === Spawning ===
    pub ghost_count: usize,
    /// Minimum Manhattan distance between the player spawn and scanned ghost spawns
    pub ghost_min_spawn_distance: i32,
    /// Explicit player spawn (default: first open cell)
    pub player_spawn: Option<Cell>,
    /// Explicit ghost spawns (default: scanned from the layout)
    pub ghost_spawns: Option<Vec<Cell>>,

    // === Rules ===
    pub pellet_score: u64,
    /// Seed for ghost decisions
    pub seed: u64,
    /// ASCII maze rows (default: the classic maze)
    pub layout: Option<Vec<String>>,

    // === Demo runner ===
    /// Attract-mode runs stop after this long
    pub max_demo_seconds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            fps: FPS,

            player_speed: PLAYER_TILES_PER_SEC,
            ghost_speed: GHOST_TILES_PER_SEC,
            actor_radius: None,

            ghost_count: GHOST_COUNT,
            ghost_min_spawn_distance: GHOST_MIN_SPAWN_DISTANCE,
            player_spawn: None,
            ghost_spawns: None,

            pellet_score: PELLET_SCORE,
            seed: 0x5eed,
            layout: None,

            max_demo_seconds: 120,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read a settings file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective actor radius in pixels
    pub fn radius(&self) -> f32 {
        self.actor_radius
            .unwrap_or(self.tile_size / 2.0 - ACTOR_RADIUS_MARGIN)
    }

    /// Player speed in pixels per step
    pub fn player_step(&self) -> f32 {
        tiles_per_sec_to_step(self.player_speed, self.tile_size, self.fps)
    }

    /// Ghost speed in pixels per step
    pub fn ghost_step(&self) -> f32 {
        tiles_per_sec_to_step(self.ghost_speed, self.tile_size, self.fps)
    }

    /// Build the configured maze
    pub fn grid(&self) -> Result<Grid, SettingsError> {
        match &self.layout {
            Some(rows) => Ok(Grid::from_ascii(rows, self.tile_size)?),
            None => Ok(Grid::classic(self.tile_size)?),
        }
    }

    /// Check the limits the mover depends on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(invalid("tile_size", "must be positive"));
        }
        if self.fps == 0 {
            return Err(invalid("fps", "must be positive"));
        }

        let radius = self.radius();
        if !(radius.is_finite() && radius > 0.0 && radius < self.tile_size / 2.0) {
            return Err(invalid(
                "actor_radius",
                format!(
                    "{radius} must be positive and below half a tile ({})",
                    self.tile_size / 2.0
                ),
            ));
        }

        for (field, step) in [
            ("player_speed", self.player_step()),
            ("ghost_speed", self.ghost_step()),
        ] {
            if !(step.is_finite() && step >= 0.0 && step < self.tile_size) {
                return Err(invalid(
                    field,
                    format!("{step} px/step must be below one tile per step"),
                ));
            }
        }

        if self.ghost_min_spawn_distance < 0 {
            return Err(invalid("ghost_min_spawn_distance", "must not be negative"));
        }
        Ok(())
    }
}
