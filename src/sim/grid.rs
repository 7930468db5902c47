//! Maze grid: cell kinds, layout parsing and pixel/cell conversion
//!
//! The grid is immutable for the lifetime of a session. Eaten pellets are
//! tracked by the game state, never by rewriting cells.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actor::Direction;
use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH};

/// What occupies a maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Pellet,
    /// Open at the screen edge; actors crossing it wrap to the other side
    Tunnel,
}

impl CellKind {
    /// Numeric layout codes: 0 empty, 1 wall, 2 pellet, 5 tunnel
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellKind::Empty),
            1 => Some(CellKind::Wall),
            2 => Some(CellKind::Pellet),
            5 => Some(CellKind::Tunnel),
            _ => None,
        }
    }

    /// ASCII layout symbols: ' ' empty, '#' wall, '.' pellet, 'T' tunnel
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            ' ' => Some(CellKind::Empty),
            '#' => Some(CellKind::Wall),
            '.' => Some(CellKind::Pellet),
            'T' => Some(CellKind::Tunnel),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => ' ',
            CellKind::Wall => '#',
            CellKind::Pellet => '.',
            CellKind::Tunnel => 'T',
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self == CellKind::Wall
    }
}

/// Grid coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbouring cell one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self::new(self.col + dc, self.row + dr)
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.col - other.col).abs() + (self.row - other.row).abs()
    }
}

impl From<(i32, i32)> for Cell {
    fn from((col, row): (i32, i32)) -> Self {
        Self::new(col, row)
    }
}

/// Layout construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown cell symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
    #[error("unknown cell code {code} at row {row}, column {col}")]
    UnknownCode { code: u8, row: usize, col: usize },
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
}

/// Static maze layout, indexed by (column, row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tile_size: f32,
    /// Row-major cell kinds
    cells: Vec<CellKind>,
}

/// Built-in maze: 0 empty, 1 wall, 2 pellet, 5 tunnel (row 10)
const CLASSIC_LAYOUT: [[u8; MAZE_WIDTH as usize]; 22] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 0, 1, 1, 0, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 1, 2, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 2, 1, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 2, 1, 1, 0, 1, 1, 1, 0, 0, 1, 1, 1, 0, 1, 1, 2, 1, 1, 1, 1, 1, 1],
    [5, 0, 0, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 5],
    [1, 1, 1, 1, 1, 1, 2, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 2, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 1, 2, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 2, 1, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 2, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 2, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 2, 0, 0, 2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 1],
    [1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl Grid {
    /// The built-in maze, padded with wall rows to the full maze height
    pub fn classic(tile_size: f32) -> Result<Self, GridError> {
        let mut grid = Self::from_codes(&CLASSIC_LAYOUT, tile_size)?;
        grid.cells.resize((MAZE_WIDTH * MAZE_HEIGHT) as usize, CellKind::Wall);
        grid.height = MAZE_HEIGHT;
        Ok(grid)
    }

    /// Build from rows of numeric layout codes
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> Result<Self, GridError> {
        Self::build(rows.len(), tile_size, |row_index, cells| {
            let row = rows[row_index].as_ref();
            for (col, &code) in row.iter().enumerate() {
                let kind = CellKind::from_code(code).ok_or(GridError::UnknownCode {
                    code,
                    row: row_index,
                    col,
                })?;
                cells.push(kind);
            }
            Ok(row.len())
        })
    }

    /// Build from ASCII rows (see [`CellKind::from_symbol`])
    pub fn from_ascii<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, GridError> {
        Self::build(rows.len(), tile_size, |row_index, cells| {
            let mut len = 0;
            for (col, symbol) in rows[row_index].as_ref().chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or(GridError::UnknownSymbol {
                    symbol,
                    row: row_index,
                    col,
                })?;
                cells.push(kind);
                len += 1;
            }
            Ok(len)
        })
    }

    /// Shared row-by-row construction; `push_row` appends one row and returns its length
    fn build<F>(row_count: usize, tile_size: f32, mut push_row: F) -> Result<Self, GridError>
    where
        F: FnMut(usize, &mut Vec<CellKind>) -> Result<usize, GridError>,
    {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        if row_count == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::new();
        let mut width = 0;
        for row in 0..row_count {
            let len = push_row(row, &mut cells)?;
            if row == 0 {
                if len == 0 {
                    return Err(GridError::Empty);
                }
                width = len;
            } else if len != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    actual: len,
                });
            }
        }

        Ok(Self {
            width: width as i32,
            height: row_count as i32,
            tile_size,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width of the playfield in pixels
    #[inline]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.col) && (0..self.height).contains(&cell.row)
    }

    /// Cell kind, or `None` outside the grid
    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.cells.get((cell.row * self.width + cell.col) as usize).copied()
    }

    /// Out-of-bounds cells count as walls
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.kind(cell).is_none_or(CellKind::is_wall)
    }

    /// Cell containing a pixel position, clamped to the grid
    pub fn cell_at(&self, pos: Vec2) -> Cell {
        let Cell { col, row } = self.raw_cell_at(pos);
        Cell::new(col.clamp(0, self.width - 1), row.clamp(0, self.height - 1))
    }

    /// Unclamped floor division of a pixel position by the tile size
    fn raw_cell_at(&self, pos: Vec2) -> Cell {
        let col = (pos.x / self.tile_size).floor();
        let row = (pos.y / self.tile_size).floor();
        // Saturating casts keep huge coordinates well-defined
        Cell::new(col as i32, row as i32)
    }

    /// Pixel centre of a cell
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            cell.col as f32 * self.tile_size + half,
            cell.row as f32 * self.tile_size + half,
        )
    }

    /// Probe a pixel for collision, returning the blocking (unclamped) cell
    ///
    /// Walls block. Rows outside the grid block. Columns outside the grid
    /// block unless the edge cell of that row is a tunnel, whose mouth is
    /// open past the screen edge.
    pub fn blocking_cell_at(&self, point: Vec2) -> Option<Cell> {
        let cell = self.raw_cell_at(point);
        if !(0..self.height).contains(&cell.row) {
            return Some(cell);
        }
        let kind = if cell.col < 0 {
            self.kind(Cell::new(0, cell.row)).filter(|k| *k == CellKind::Tunnel)
        } else if cell.col >= self.width {
            self.kind(Cell::new(self.width - 1, cell.row))
                .filter(|k| *k == CellKind::Tunnel)
        } else {
            self.kind(cell)
        };
        match kind {
            Some(k) if !k.is_wall() => None,
            _ => Some(cell),
        }
    }

    /// Directions leading to an in-bounds, non-wall neighbour (Up, Down, Left, Right order)
    pub fn open_directions(&self, cell: Cell) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| !self.is_wall(cell.step(dir)))
            .collect()
    }

    /// All cells of a given kind, row-major
    pub fn cells_of(&self, kind: CellKind) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == kind)
            .map(move |(i, _)| Cell::new(i as i32 % width, i as i32 / width))
    }

    /// First non-wall cell in row-major order
    pub fn first_open_cell(&self) -> Option<Cell> {
        self.cells
            .iter()
            .position(|k| !k.is_wall())
            .map(|i| Cell::new(i as i32 % self.width, i as i32 / self.width))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(|k| k.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
