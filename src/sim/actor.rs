//! Moving circular bodies and the four maze directions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};

/// One of the four maze directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour enumeration order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset (column, row); rows grow downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit vector in pixel space
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }

    /// Direction a velocity points along, if it is axis-aligned and nonzero
    pub fn from_velocity(vel: Vec2) -> Option<Self> {
        match (vel.x != 0.0, vel.y != 0.0) {
            (true, false) if vel.x < 0.0 => Some(Direction::Left),
            (true, false) => Some(Direction::Right),
            (false, true) if vel.y < 0.0 => Some(Direction::Up),
            (false, true) => Some(Direction::Down),
            _ => None,
        }
    }
}

/// A circular body moving through the maze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Centre, in pixels
    pub pos: Vec2,
    /// Pixels per step
    pub vel: Vec2,
    pub radius: f32,
    /// Nominal pixels per step used when steering
    pub speed: f32,
    /// Cell the actor spawned in
    pub spawn: Cell,
    /// Cell containing `pos`, clamped to the grid
    pub cell: Cell,
}

impl Actor {
    /// Create an actor at rest on a cell's centre
    pub fn new(grid: &Grid, spawn: Cell, radius: f32, speed: f32) -> Self {
        Self {
            pos: grid.cell_center(spawn),
            vel: Vec2::ZERO,
            radius,
            speed,
            spawn,
            cell: grid.cell_at(grid.cell_center(spawn)),
        }
    }

    /// Recompute the derived cell from the position
    pub fn sync_cell(&mut self, grid: &Grid) {
        self.cell = grid.cell_at(self.pos);
    }

    /// Put the actor back on its spawn cell, at rest
    pub fn respawn(&mut self, grid: &Grid) {
        self.pos = grid.cell_center(self.spawn);
        self.vel = Vec2::ZERO;
        self.sync_cell(grid);
    }

    /// Offset from the current cell's centre
    pub fn offset_from_center(&self, grid: &Grid) -> Vec2 {
        self.pos - grid.cell_center(self.cell)
    }

    /// Snap one or both axes onto the current cell's centre
    pub fn snap_to_center(&mut self, grid: &Grid, snap_x: bool, snap_y: bool) {
        let center = grid.cell_center(self.cell);
        if snap_x {
            self.pos.x = center.x;
        }
        if snap_y {
            self.pos.y = center.y;
        }
    }

    /// Axis-aligned bounding squares strictly overlap
    pub fn overlaps(&self, other: &Actor) -> bool {
        let delta = (self.pos - other.pos).abs();
        let reach = self.radius + other.radius;
        delta.x < reach && delta.y < reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_basics() {
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.unit(), Vec2::new(0.0, -1.0));
        assert_eq!(
            Direction::from_velocity(Vec2::new(-1.2, 0.0)),
            Some(Direction::Left)
        );
        assert_eq!(Direction::from_velocity(Vec2::ZERO), None);
        assert_eq!(Direction::from_velocity(Vec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_actor_spawns_centered() {
        let grid = Grid::classic(24.0).unwrap();
        let actor = Actor::new(&grid, Cell::new(1, 1), 10.0, 1.2);
        assert_eq!(actor.pos, Vec2::new(36.0, 36.0));
        assert_eq!(actor.cell, Cell::new(1, 1));
        assert_eq!(actor.offset_from_center(&grid), Vec2::ZERO);
    }

    #[test]
    fn test_overlap_is_strict() {
        let grid = Grid::classic(24.0).unwrap();
        let a = Actor::new(&grid, Cell::new(1, 1), 10.0, 1.2);
        let mut b = a.clone();
        b.pos.x += 20.0;
        assert!(!a.overlaps(&b));
        b.pos.x -= 0.5;
        assert!(a.overlaps(&b));
    }
}
