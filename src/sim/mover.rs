//! Tile-constrained movement for circular actors
//!
//! One call advances an actor by one step against the static grid. The two
//! axes are resolved independently, X before Y, so an actor pushing
//! diagonally into a wall keeps sliding along the open axis. Velocities are
//! expected to stay below one tile per step; there is no swept test.

use glam::Vec2;

use super::actor::Actor;
use super::grid::{CellKind, Grid};
use crate::axis_sign;
use crate::consts::{CORNER_PROBE, SNAP_EPSILON};

/// What happened during one [`advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Horizontal motion was stopped by a wall (`vel.x` is now zero)
    pub blocked_x: bool,
    /// Vertical motion was stopped by a wall (`vel.y` is now zero)
    pub blocked_y: bool,
    /// The actor left through a tunnel and re-entered on the other side
    pub wrapped: bool,
}

impl MoveReport {
    #[inline]
    pub fn collided(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Advance an actor one step, resolving wall collisions and tunnel wrap
pub fn advance(actor: &mut Actor, grid: &Grid) -> MoveReport {
    let mut report = MoveReport {
        blocked_x: step_axis(actor, grid, Axis::X),
        blocked_y: step_axis(actor, grid, Axis::Y),
        wrapped: false,
    };

    actor.sync_cell(grid);
    report.wrapped = wrap_tunnel(actor, grid);
    if report.wrapped {
        actor.sync_cell(grid);
    }

    report
}

/// Move along one axis and snap back out of the first wall the leading corners touch
fn step_axis(actor: &mut Actor, grid: &Grid, axis: Axis) -> bool {
    let (delta, pos) = match axis {
        Axis::X => (actor.vel.x, &mut actor.pos.x),
        Axis::Y => (actor.vel.y, &mut actor.pos.y),
    };
    *pos += delta;

    let sign = axis_sign(delta);
    if sign == 0.0 {
        return false;
    }

    let r = actor.radius;
    let spread = r * CORNER_PROBE;
    let tile = grid.tile_size();

    for side in [-spread, spread] {
        // Leading edge along the axis, corner offset across it
        let probe = match axis {
            Axis::X => Vec2::new(actor.pos.x + sign * r, actor.pos.y + side),
            Axis::Y => Vec2::new(actor.pos.x + side, actor.pos.y + sign * r),
        };
        let Some(blocker) = grid.blocking_cell_at(probe) else {
            continue;
        };

        let index = match axis {
            Axis::X => blocker.col,
            Axis::Y => blocker.row,
        } as f32;
        let snapped = if sign > 0.0 {
            index * tile - r - SNAP_EPSILON
        } else {
            (index + 1.0) * tile + r + SNAP_EPSILON
        };
        match axis {
            Axis::X => {
                actor.pos.x = snapped;
                actor.vel.x = 0.0;
            }
            Axis::Y => {
                actor.pos.y = snapped;
                actor.vel.y = 0.0;
            }
        }
        return true;
    }

    false
}

/// Teleport an actor that has run out through a tunnel cell's screen edge
fn wrap_tunnel(actor: &mut Actor, grid: &Grid) -> bool {
    if grid.kind(actor.cell) != Some(CellKind::Tunnel) {
        return false;
    }

    let tile = grid.tile_size();
    let half = tile / 2.0;
    if actor.vel.x < 0.0 && actor.pos.x < half {
        actor.pos.x = (grid.width() - 1) as f32 * tile - half;
        log::trace!("Tunnel wrap left -> x={}", actor.pos.x);
        true
    } else if actor.vel.x > 0.0 && actor.pos.x > grid.pixel_width() - half {
        actor.pos.x = half;
        log::trace!("Tunnel wrap right -> x={}", actor.pos.x);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use proptest::prelude::*;

    const TILE: f32 = 24.0;
    const RADIUS: f32 = 10.0;
    const SPEED: f32 = 1.2;

    fn actor_at(grid: &Grid, col: i32, row: i32, vel: Vec2) -> Actor {
        let mut actor = Actor::new(grid, Cell::new(col, row), RADIUS, SPEED);
        actor.vel = vel;
        actor
    }

    fn tunnel_row_grid() -> Grid {
        Grid::from_ascii(&["########", "T      T", "########"], TILE).unwrap()
    }

    #[test]
    fn test_free_move_in_corridor() {
        let grid = Grid::classic(TILE).unwrap();
        let mut actor = actor_at(&grid, 2, 1, Vec2::new(SPEED, 0.0));
        let report = advance(&mut actor, &grid);
        assert!(!report.collided());
        assert!((actor.pos.x - (2.5 * TILE + SPEED)).abs() < 1e-4);
        assert_eq!(actor.vel, Vec2::new(SPEED, 0.0));
    }

    #[test]
    fn test_dead_end_open_side() {
        // Three walls around (1,1), opening to the right
        let grid = Grid::from_ascii(&["#####", "#   #", "#####"], TILE).unwrap();
        let start = grid.cell_center(Cell::new(1, 1));
        let mut actor = actor_at(&grid, 1, 1, Vec2::new(SPEED, 0.0));

        let report = advance(&mut actor, &grid);
        assert_eq!(report, MoveReport::default());
        assert!((actor.pos.x - start.x - SPEED).abs() < 1e-4);
        assert_eq!(actor.pos.y, start.y);
    }

    #[test]
    fn test_wall_snap_right() {
        let grid = Grid::from_ascii(&["####", "#  #", "####"], TILE).unwrap();
        // Leading edge will cross into column 3 this step
        let mut actor = actor_at(&grid, 2, 1, Vec2::new(3.0, 0.0));
        actor.pos.x = 3.0 * TILE - RADIUS - 1.0;

        let report = advance(&mut actor, &grid);
        assert!(report.blocked_x);
        assert_eq!(actor.vel.x, 0.0);
        assert!((actor.pos.x - (3.0 * TILE - RADIUS - SNAP_EPSILON)).abs() < 1e-4);
    }

    #[test]
    fn test_wall_snap_up() {
        let grid = Grid::from_ascii(&["###", "# #", "# #", "###"], TILE).unwrap();
        let mut actor = actor_at(&grid, 1, 1, Vec2::new(0.0, -3.0));
        actor.pos.y = TILE + RADIUS + 1.0;

        let report = advance(&mut actor, &grid);
        assert!(report.blocked_y);
        assert!(!report.blocked_x);
        assert_eq!(actor.vel.y, 0.0);
        assert!((actor.pos.y - (TILE + RADIUS + SNAP_EPSILON)).abs() < 1e-4);
    }

    #[test]
    fn test_corner_stop_then_slide() {
        // Moving down-right from (1,1): wall to the right, open below
        let grid = Grid::from_ascii(&["####", "# ##", "#  #", "####"], TILE).unwrap();
        let mut actor = actor_at(&grid, 1, 1, Vec2::new(SPEED, SPEED));
        actor.pos.x = 2.0 * TILE - RADIUS - 0.5;
        let start_y = actor.pos.y;

        let report = advance(&mut actor, &grid);
        assert!(report.blocked_x);
        assert!(!report.blocked_y);
        assert_eq!(actor.vel.x, 0.0);
        assert_eq!(actor.vel.y, SPEED);
        assert!((actor.pos.y - (start_y + SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_tunnel_exit_left() {
        let grid = tunnel_row_grid();
        let mut actor = actor_at(&grid, 0, 1, Vec2::new(-SPEED, 0.0));

        let report = advance(&mut actor, &grid);
        assert!(report.wrapped);
        assert!(!report.collided());
        assert_eq!(actor.pos.x, (grid.width() - 1) as f32 * TILE - TILE / 2.0);
        assert_eq!(actor.vel, Vec2::new(-SPEED, 0.0));
        assert_eq!(actor.cell, Cell::new(grid.width() - 2, 1));
    }

    #[test]
    fn test_tunnel_exit_right() {
        let grid = tunnel_row_grid();
        let mut actor = actor_at(&grid, 7, 1, Vec2::new(SPEED, 0.0));

        let report = advance(&mut actor, &grid);
        assert!(report.wrapped);
        assert_eq!(actor.pos.x, TILE / 2.0);
        assert_eq!(actor.vel, Vec2::new(SPEED, 0.0));
        assert_eq!(actor.cell, Cell::new(0, 1));
    }

    #[test]
    fn test_tunnel_exit_fast_mover_keeps_velocity() {
        // Leading edge pokes past the screen edge through the open tunnel mouth
        let grid = tunnel_row_grid();
        let vel = Vec2::new(-5.0, 0.0);
        let mut actor = actor_at(&grid, 0, 1, vel);

        let report = advance(&mut actor, &grid);
        assert!(report.wrapped);
        assert!(!report.blocked_x);
        assert_eq!(actor.vel, vel);
    }

    #[test]
    fn test_wall_row_edge_blocks() {
        // Row 8 of the classic maze starts with empty cells but no tunnel
        let grid = Grid::classic(TILE).unwrap();
        let mut actor = actor_at(&grid, 0, 8, Vec2::new(-5.0, 0.0));
        let report = advance(&mut actor, &grid);
        assert!(report.blocked_x);
        assert!(!report.wrapped);
        assert!(actor.pos.x >= RADIUS);
    }

    #[test]
    fn test_resting_in_tunnel_does_not_wrap() {
        let grid = tunnel_row_grid();
        let mut actor = actor_at(&grid, 0, 1, Vec2::ZERO);
        actor.pos.x = 3.0;
        let before = actor.clone();
        let report = advance(&mut actor, &grid);
        assert_eq!(report, MoveReport::default());
        assert_eq!(actor.pos, before.pos);
    }

    fn open_cells(grid: &Grid) -> Vec<Cell> {
        (0..grid.height())
            .flat_map(|row| (0..grid.width()).map(move |col| Cell::new(col, row)))
            .filter(|cell| !grid.is_wall(*cell))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_never_enters_wall(
            start in any::<prop::sample::Index>(),
            vx in -2.4f32..2.4,
            vy in -2.4f32..2.4,
            steps in 1usize..300,
        ) {
            let grid = Grid::classic(TILE).unwrap();
            let cells = open_cells(&grid);
            let cell = cells[start.index(cells.len())];
            let mut actor = actor_at(&grid, cell.col, cell.row, Vec2::new(vx, vy));

            for _ in 0..steps {
                advance(&mut actor, &grid);
                let center_cell = grid.cell_at(actor.pos);
                prop_assert!(!grid.is_wall(center_cell), "centre entered wall at {:?}", center_cell);
                prop_assert!(actor.pos.x >= 0.0 && actor.pos.x <= grid.pixel_width());
            }
        }

        #[test]
        fn prop_cell_always_in_bounds(
            x in -1.0e6f32..1.0e6,
            y in -1.0e6f32..1.0e6,
        ) {
            let grid = Grid::classic(TILE).unwrap();
            let cell = grid.cell_at(Vec2::new(x, y));
            prop_assert!(grid.in_bounds(cell));
        }

        #[test]
        fn prop_rest_is_idempotent(
            x in 0.0f32..(28.0 * 24.0),
            y in 0.0f32..(31.0 * 24.0),
        ) {
            let grid = Grid::classic(TILE).unwrap();
            let mut actor = actor_at(&grid, 1, 1, Vec2::ZERO);
            actor.pos = Vec2::new(x, y);
            actor.sync_cell(&grid);
            let before = actor.clone();

            let report = advance(&mut actor, &grid);
            prop_assert_eq!(report, MoveReport::default());
            prop_assert_eq!(actor, before);
        }

        #[test]
        fn prop_tunnel_round_trip_keeps_velocity(speed in 0.1f32..2.0) {
            let grid = Grid::classic(TILE).unwrap();
            let vel = Vec2::new(-speed, 0.0);
            let mut actor = actor_at(&grid, 0, 10, vel);
            actor.pos.x = TILE / 2.0;

            let report = advance(&mut actor, &grid);
            prop_assert!(report.wrapped);
            prop_assert_eq!(actor.vel, vel);
            prop_assert_eq!(actor.pos.x, (grid.width() - 1) as f32 * TILE - TILE / 2.0);
        }
    }
}
