//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected direction choosers only (seeded or scripted)
//! - Stable iteration order (by actor ID)
//! - No rendering or platform dependencies

pub mod actor;
pub mod control;
pub mod grid;
pub mod mover;
pub mod state;
pub mod tick;

pub use actor::{Actor, Direction};
pub use control::{
    Controller, DirectionChooser, GhostController, PlayerController, ScriptedChooser,
    SeededChooser,
};
pub use grid::{Cell, CellKind, Grid, GridError};
pub use mover::{MoveReport, advance};
pub use state::{GameEvent, GamePhase, GameState, Mob};
pub use tick::{TickInput, tick};
