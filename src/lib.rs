//! Maze Chase - a tile maze chase simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, movement, controllers, game state)
//! - `settings`: JSON configuration
//! - `platform`: Native platform helpers (frame clock)

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Pixels per maze cell
    pub const TILE_SIZE: f32 = 24.0;
    /// Classic maze dimensions (cells)
    pub const MAZE_WIDTH: i32 = 28;
    pub const MAZE_HEIGHT: i32 = 31;

    /// Fixed frame rate of the update loop
    pub const FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Actor speeds in tiles per second
    pub const PLAYER_TILES_PER_SEC: f32 = 3.0;
    pub const GHOST_TILES_PER_SEC: f32 = 2.8;

    /// Actor radius is a little under half a tile
    pub const ACTOR_RADIUS_MARGIN: f32 = 2.0;

    /// Perpendicular corner probes sit at this fraction of the radius
    pub const CORNER_PROBE: f32 = 0.9;
    /// Gap left between an actor and the wall it was snapped against
    pub const SNAP_EPSILON: f32 = 0.01;
    /// An actor is centred on an axis within this fraction of its speed
    pub const CENTER_TOLERANCE: f32 = 0.5;

    /// Ghost defaults
    pub const GHOST_COUNT: usize = 4;
    pub const GHOST_MIN_SPAWN_DISTANCE: i32 = 3;

    /// Points per pellet
    pub const PELLET_SCORE: u64 = 10;
}

/// Convert a speed in tiles per second to pixels per step
#[inline]
pub fn tiles_per_sec_to_step(tiles_per_sec: f32, tile_size: f32, fps: u32) -> f32 {
    tile_size * tiles_per_sec / fps as f32
}

/// Component-wise sign that maps zero to zero (unlike `f32::signum`)
#[inline]
pub fn axis_sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
