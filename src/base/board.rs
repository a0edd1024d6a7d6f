use super::Vec2D;
use crate::error::{Error, Result};
use log::{debug, trace, warn};
use rand::{prelude::*, rngs::StdRng};

/// Rejection sampling gives up after this many draws per cell and places the rest in order.
const MAX_DRAWS_PER_CELL: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Covered,
    Flagged,
    Opened,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub has_mine: bool,
    /// Mines among the surrounding cells. Only meaningful when `has_mine` is false.
    pub neighbor_count: u8,
    pub state: CellState,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        !self.has_mine && self.neighbor_count == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    InvalidPosition,
    CellFlagged,
    CellOpened,
    GameOver,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::InvalidPosition => write!(f, "position is outside the board"),
            RejectReason::CellFlagged => write!(f, "cell is flagged"),
            RejectReason::CellOpened => write!(f, "cell is already open"),
            RejectReason::GameOver => write!(f, "game is over"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    MineTriggered,
    AlreadyOpen,
    Rejected(RejectReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    Rejected(RejectReason),
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, FlagOutcome::Flagged | FlagOutcome::Unflagged)
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    cells: Vec2D<Cell>,
    mines: usize,
    flags: usize,
}

impl Board {
    /// Creates a board with randomly placed mines.
    pub fn new(rows: usize, columns: usize, mines: usize) -> Result<Self> {
        Self::with_seed(rows, columns, mines, rand::random())
    }

    /// Creates a board whose mine layout is fully determined by `seed`.
    pub fn with_seed(rows: usize, columns: usize, mines: usize, seed: u64) -> Result<Self> {
        validate(rows, columns, mines)?;
        let mut board = Self {
            cells: Vec2D::new(rows, columns),
            mines,
            flags: 0,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        board.place_mines(&mut rng);
        board.count_neighbors();
        debug!("Created {rows}x{columns} board with {mines} mines (seed {seed})");
        Ok(board)
    }

    /// Creates a board with mines at exactly the given positions. Duplicates count once.
    #[cfg(test)]
    pub fn with_mines(rows: usize, columns: usize, positions: &[(usize, usize)]) -> Result<Self> {
        validate(rows, columns, positions.len())?;
        let mut cells: Vec2D<Cell> = Vec2D::new(rows, columns);
        for &(row, column) in positions {
            let Some(cell) = cells.get_mut(row, column) else {
                return Err(Error::InvalidBoard {
                    rows,
                    columns,
                    mines: positions.len(),
                });
            };
            cell.has_mine = true;
        }
        let mines = cells.iter().filter(|c| c.has_mine).count();
        let mut board = Self { cells, mines, flags: 0 };
        board.count_neighbors();
        Ok(board)
    }

    fn place_mines(&mut self, rng: &mut StdRng) {
        let (rows, columns) = self.cells.dims();
        let max_draws = MAX_DRAWS_PER_CELL * self.cells.len();
        let mut placed = 0;
        let mut draws = 0;

        while placed < self.mines && draws < max_draws {
            draws += 1;
            let cell = &mut self.cells[(rng.random_range(0..rows), rng.random_range(0..columns))];
            if !cell.has_mine {
                cell.has_mine = true;
                placed += 1;
            }
        }

        if placed < self.mines {
            warn!(
                "Gave up sampling after {draws} draws with {placed}/{} mines placed, filling in order",
                self.mines
            );
            for cell in self.cells.iter_mut().filter(|c| !c.has_mine).take(self.mines - placed) {
                cell.has_mine = true;
            }
        }
    }

    fn count_neighbors(&mut self) {
        let (rows, columns) = self.cells.dims();
        for row in 0..rows {
            for column in 0..columns {
                if self.cells[(row, column)].has_mine {
                    continue;
                }
                let count = self
                    .cells
                    .neighbors(row, column)
                    .filter(|&(r, c)| self.cells.get(r, c).is_some_and(|cell| cell.has_mine))
                    .count();
                self.cells[(row, column)].neighbor_count = count as u8;
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.dims().0
    }

    pub fn columns(&self) -> usize {
        self.cells.dims().1
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    /// Mines minus placed flags. Negative when more flags than mines are placed.
    pub fn flags_remaining(&self) -> isize {
        self.mines as isize - self.flags as isize
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells.get(row, column)
    }

    pub fn cells(&self) -> &Vec2D<Cell> {
        &self.cells
    }

    /// Opens the cell at `(row, column)`, flooding outwards from empty cells.
    pub fn open(&mut self, row: usize, column: usize) -> OpenOutcome {
        let Some(cell) = self.cells.get_mut(row, column) else {
            return OpenOutcome::Rejected(RejectReason::InvalidPosition);
        };
        match cell.state {
            CellState::Flagged => return OpenOutcome::Rejected(RejectReason::CellFlagged),
            CellState::Opened => return OpenOutcome::AlreadyOpen,
            CellState::Covered => {},
        }

        cell.state = CellState::Opened;
        if cell.has_mine {
            return OpenOutcome::MineTriggered;
        }
        if cell.is_empty() {
            self.flood_fill(row, column);
        }
        OpenOutcome::Opened
    }

    fn flood_fill(&mut self, row: usize, column: usize) {
        let mut pending: Vec<(usize, usize)> = self.cells.neighbors(row, column).collect();
        let mut opened = 0usize;

        while let Some(pos) = pending.pop() {
            let cell = &mut self.cells[pos];
            if cell.state != CellState::Covered || cell.has_mine {
                continue;
            }
            cell.state = CellState::Opened;
            opened += 1;
            if cell.neighbor_count == 0 {
                pending.extend(self.cells.neighbors(pos.0, pos.1));
            }
        }

        trace!("Flood fill from ({row}, {column}) opened {opened} cells");
    }

    pub fn toggle_flag(&mut self, row: usize, column: usize) -> FlagOutcome {
        let Some(cell) = self.cells.get_mut(row, column) else {
            return FlagOutcome::Rejected(RejectReason::InvalidPosition);
        };
        match cell.state {
            CellState::Covered => {
                cell.state = CellState::Flagged;
                self.flags += 1;
                FlagOutcome::Flagged
            },
            CellState::Flagged => {
                cell.state = CellState::Covered;
                self.flags = self.flags.saturating_sub(1);
                FlagOutcome::Unflagged
            },
            CellState::Opened => FlagOutcome::Rejected(RejectReason::CellOpened),
        }
    }

    /// Every cell is either opened or a correctly flagged mine.
    pub fn check_win(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.state == CellState::Opened || (c.state == CellState::Flagged && c.has_mine))
    }
}

fn validate(rows: usize, columns: usize, mines: usize) -> Result<()> {
    if rows == 0 || columns == 0 || mines > rows * columns {
        return Err(Error::InvalidBoard { rows, columns, mines });
    }
    Ok(())
}
