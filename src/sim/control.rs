//! Steering: turn queueing for the player, wandering for ghosts
//!
//! Controllers only change an actor's velocity (and snap it onto a cell
//! centre when turning). Position updates are left to [`super::mover::advance`],
//! which treats every actor the same way.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, Direction};
use super::grid::{Cell, Grid};
use crate::axis_sign;
use crate::consts::CENTER_TOLERANCE;

/// Picks one direction out of a set of legal candidates
pub trait DirectionChooser {
    /// Returns `None` only when `candidates` is empty
    fn choose_direction(&mut self, candidates: &[Direction]) -> Option<Direction>;
}

/// Uniform random choice from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct SeededChooser {
    rng: Pcg32,
}

impl SeededChooser {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl DirectionChooser for SeededChooser {
    fn choose_direction(&mut self, candidates: &[Direction]) -> Option<Direction> {
        candidates.choose(&mut self.rng).copied()
    }
}

/// Replays a fixed script, cycling when it runs out
///
/// A scripted direction that is not a candidate falls back to the first candidate.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    script: Vec<Direction>,
    cursor: usize,
}

impl ScriptedChooser {
    pub fn new(script: Vec<Direction>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl DirectionChooser for ScriptedChooser {
    fn choose_direction(&mut self, candidates: &[Direction]) -> Option<Direction> {
        let first = *candidates.first()?;
        if self.script.is_empty() {
            return Some(first);
        }
        let wanted = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        Some(if candidates.contains(&wanted) { wanted } else { first })
    }
}

/// Whether the actor sits within half a step of its cell centre on (x, y)
fn centering(actor: &Actor, grid: &Grid) -> (bool, bool) {
    let tolerance = actor.speed * CENTER_TOLERANCE;
    let offset = actor.offset_from_center(grid);
    (offset.x.abs() < tolerance, offset.y.abs() < tolerance)
}

/// Open directions from the actor's cell, minus the reverse when there is a choice
fn forward_options(actor: &Actor, grid: &Grid) -> Vec<Direction> {
    let open = grid.open_directions(actor.cell);
    match Direction::from_velocity(actor.vel) {
        Some(heading) if open.len() > 1 => open
            .into_iter()
            .filter(|&dir| dir != heading.opposite())
            .collect(),
        _ => open,
    }
}

/// Player steering with a one-slot turn queue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    /// Requested velocity, kept until a turn accepts it
    queued: Option<Vec2>,
}

impl PlayerController {
    /// Request a move; replaces any earlier request
    pub fn queue(&mut self, dir: Direction, speed: f32) {
        self.queued = Some(dir.unit() * speed);
    }

    pub fn queued(&self) -> Option<Vec2> {
        self.queued
    }

    pub fn clear(&mut self) {
        self.queued = None;
    }

    /// Apply the queued move if the turn is legal right now
    ///
    /// Turning onto an idle axis needs the actor centred across it; reversing
    /// along the current axis is allowed anywhere. The neighbour in the queued
    /// direction must not be a wall. On acceptance every axis the actor was
    /// not moving along is snapped to the cell centre. Returns whether the
    /// turn was taken.
    pub fn steer(&mut self, actor: &mut Actor, grid: &Grid) -> bool {
        let Some(wanted) = self.queued else {
            return false;
        };
        let (centered_x, centered_y) = centering(actor, grid);
        let vel = actor.vel;

        let onto_x = wanted.x != 0.0 && vel.x == 0.0 && centered_y;
        let onto_y = wanted.y != 0.0 && vel.y == 0.0 && centered_x;
        let reverse = wanted.x * vel.x < 0.0 || wanted.y * vel.y < 0.0;
        if !(onto_x || onto_y || reverse) {
            return false;
        }

        let target = Cell::new(
            actor.cell.col + axis_sign(wanted.x) as i32,
            actor.cell.row + axis_sign(wanted.y) as i32,
        );
        if grid.is_wall(target) {
            return false;
        }

        actor.snap_to_center(grid, vel.x == 0.0, vel.y == 0.0);
        actor.vel = wanted;
        self.queued = None;
        true
    }

    /// Attract mode: queue a direction whenever the player reaches a decision point
    ///
    /// Prefers neighbours that still hold a pellet. Does nothing between cell
    /// centres while the player is moving.
    pub fn autopilot<C: DirectionChooser + ?Sized>(
        &mut self,
        actor: &Actor,
        grid: &Grid,
        pellets: &BTreeSet<Cell>,
        chooser: &mut C,
    ) {
        let (centered_x, centered_y) = centering(actor, grid);
        let stopped = actor.vel == Vec2::ZERO;
        if !(stopped || (centered_x && centered_y)) {
            return;
        }

        let options = forward_options(actor, grid);
        let hungry: Vec<Direction> = options
            .iter()
            .copied()
            .filter(|&dir| pellets.contains(&actor.cell.step(dir)))
            .collect();
        let pool = if hungry.is_empty() { &options } else { &hungry };
        if let Some(dir) = chooser.choose_direction(pool) {
            self.queue(dir, actor.speed);
        }
    }
}

/// Ghost steering: random turns at cell centres
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostController;

impl GhostController {
    /// At a cell centre, or when stopped, pick a new heading
    ///
    /// Reversing is avoided unless it is the only way out. Returns the new
    /// heading when a decision was made.
    pub fn steer<C: DirectionChooser + ?Sized>(
        &mut self,
        actor: &mut Actor,
        grid: &Grid,
        chooser: &mut C,
    ) -> Option<Direction> {
        let (centered_x, centered_y) = centering(actor, grid);
        let stopped = actor.vel == Vec2::ZERO;
        if !(stopped || (centered_x && centered_y)) {
            return None;
        }

        actor.snap_to_center(grid, true, true);
        let choice = chooser.choose_direction(&forward_options(actor, grid));
        actor.vel = choice.map_or(Vec2::ZERO, |dir| dir.unit() * actor.speed);
        choice
    }
}

/// Closed set of steering behaviours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    Player(PlayerController),
    Ghost(GhostController),
}

impl Controller {
    /// Update the actor's velocity for this step
    pub fn steer<C: DirectionChooser + ?Sized>(
        &mut self,
        actor: &mut Actor,
        grid: &Grid,
        chooser: &mut C,
    ) {
        match self {
            Controller::Player(player) => {
                player.steer(actor, grid);
            }
            Controller::Ghost(ghost) => {
                if let Some(dir) = ghost.steer(actor, grid, chooser) {
                    log::trace!("Ghost at {:?} heads {:?}", actor.cell, dir);
                }
            }
        }
    }

    /// Forget anything carried over from before a respawn
    pub fn reset(&mut self) {
        match self {
            Controller::Player(player) => player.clear(),
            Controller::Ghost(_) => {}
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerController> {
        match self {
            Controller::Player(player) => Some(player),
            Controller::Ghost(_) => None,
        }
    }
}
