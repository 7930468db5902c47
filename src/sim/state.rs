//! Game state and session setup
//!
//! One `GameState` is one session: it owns the maze, the remaining pellets
//! and every actor. Nothing lives in globals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::control::{Controller, DirectionChooser, GhostController, PlayerController};
use super::grid::{Cell, CellKind, Grid};
use super::mover::{MoveReport, advance};
use crate::settings::{Settings, SettingsError};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Actors are moving
    Playing,
    /// A ghost caught the player
    GameOver,
    /// Every pellet was eaten
    Won,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PelletEaten { cell: Cell, score: u64 },
    PlayerCaught { ghost_id: u32 },
    MazeCleared { score: u64 },
    Restarted,
}

/// An actor together with whatever steers it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mob {
    pub id: u32,
    pub actor: Actor,
    pub controller: Controller,
}

impl Mob {
    /// Steer, then move one step
    pub fn step<C: DirectionChooser + ?Sized>(
        &mut self,
        grid: &Grid,
        chooser: &mut C,
    ) -> MoveReport {
        self.controller.steer(&mut self.actor, grid, chooser);
        advance(&mut self.actor, grid)
    }

    /// Back to the spawn cell with a fresh controller
    fn reset(&mut self, grid: &Grid) {
        self.actor.respawn(grid);
        self.controller.reset();
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the session was configured with
    pub seed: u64,
    /// Static maze
    pub grid: Grid,
    /// Cells still holding a pellet
    pub pellets: BTreeSet<Cell>,
    pub player: Mob,
    /// Ghosts, sorted by id
    pub ghosts: Vec<Mob>,
    pub score: u64,
    pub pellet_score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Build a session from validated settings
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let grid = settings.grid()?;
        let radius = settings.radius();

        let player_spawn = match settings.player_spawn {
            Some(cell) => open_spawn(&grid, cell)?,
            None => grid.first_open_cell().ok_or(SettingsError::NoOpenCell)?,
        };
        let ghost_spawns = match &settings.ghost_spawns {
            Some(cells) => cells
                .iter()
                .map(|&cell| open_spawn(&grid, cell))
                .collect::<Result<Vec<_>, _>>()?,
            None => scan_ghost_spawns(
                &grid,
                player_spawn,
                settings.ghost_min_spawn_distance,
                settings.ghost_count,
            ),
        };
        if ghost_spawns.len() < settings.ghost_count && settings.ghost_spawns.is_none() {
            log::warn!(
                "Only {} of {} ghosts could be placed",
                ghost_spawns.len(),
                settings.ghost_count
            );
        }

        let player = Mob {
            id: 0,
            actor: Actor::new(&grid, player_spawn, radius, settings.player_step()),
            controller: Controller::Player(PlayerController::default()),
        };
        let ghosts = ghost_spawns
            .into_iter()
            .zip(1..)
            .map(|(cell, id)| Mob {
                id,
                actor: Actor::new(&grid, cell, radius, settings.ghost_step()),
                controller: Controller::Ghost(GhostController),
            })
            .collect();

        let mut state = Self {
            seed: settings.seed,
            pellets: BTreeSet::new(),
            grid,
            player,
            ghosts,
            score: 0,
            pellet_score: settings.pellet_score,
            phase: GamePhase::Playing,
            time_ticks: 0,
        };
        state.reset_pellets();

        log::info!(
            "Session ready: {}x{} maze, {} pellets, {} ghosts, player at {:?}",
            state.grid.width(),
            state.grid.height(),
            state.pellets.len(),
            state.ghosts.len(),
            player_spawn
        );
        Ok(state)
    }

    /// Start over on the same maze and spawns
    pub fn restart(&mut self) {
        self.reset_pellets();
        self.player.reset(&self.grid);
        for ghost in &mut self.ghosts {
            ghost.reset(&self.grid);
        }
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        log::info!("Session restarted");
    }

    fn reset_pellets(&mut self) {
        self.pellets = self.grid.cells_of(CellKind::Pellet).collect();
    }

    /// Remaining pellet count
    pub fn pellets_left(&self) -> usize {
        self.pellets.len()
    }

    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }
}

fn open_spawn(grid: &Grid, cell: Cell) -> Result<Cell, SettingsError> {
    if grid.is_wall(cell) {
        Err(SettingsError::BadSpawn(cell))
    } else {
        Ok(cell)
    }
}

/// Row-major open cells away from the player, up to `count`
fn scan_ghost_spawns(grid: &Grid, player: Cell, min_distance: i32, count: usize) -> Vec<Cell> {
    (0..grid.height())
        .flat_map(|row| (0..grid.width()).map(move |col| Cell::new(col, row)))
        .filter(|&cell| {
            !grid.is_wall(cell) && cell != player && cell.manhattan(player) >= min_distance
        })
        .take(count)
        .collect()
}
