//! Board and position model for an 8x8 draughts board.
//!
//! The board is plain data: a dense array of cells addressed by `row * N + col`.
//! It knows nothing about which squares are playable; the rules engine only
//! ever touches the dark squares, where `(row + col)` is odd.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the board.
pub const BOARD_SIZE: i32 = 8;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player{
    White,
    Black
}

impl Player{
    /// Returns the other side.
    #[inline]
    pub fn opponent(self) -> Player{
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White
        }
    }

    /// Row a man of this side must reach to be promoted.
    ///
    /// White starts on rows 0-2 and advances towards row 7, black starts on
    /// rows 5-7 and advances towards row 0.
    #[inline]
    pub fn promotion_row(self) -> i32{
        match self {
            Player::White => BOARD_SIZE - 1,
            Player::Black => 0
        }
    }

    /// Row delta of a forward step for a man of this side.
    #[inline]
    pub fn forward(self) -> i32{
        match self {
            Player::White => 1,
            Player::Black => -1
        }
    }
}

/// Content of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell{
    #[default]
    Empty,
    WhiteMan,
    BlackMan,
    WhiteQueen,
    BlackQueen
}

impl Cell{
    /// The man of the given side.
    #[inline]
    pub fn man(player: Player) -> Cell{
        match player {
            Player::White => Cell::WhiteMan,
            Player::Black => Cell::BlackMan
        }
    }

    /// The queen of the given side.
    #[inline]
    pub fn queen(player: Player) -> Cell{
        match player {
            Player::White => Cell::WhiteQueen,
            Player::Black => Cell::BlackQueen
        }
    }

    /// Side owning the piece in this cell, `None` when the cell is empty.
    #[inline]
    pub fn owner(self) -> Option<Player>{
        match self {
            Cell::Empty => None,
            Cell::WhiteMan | Cell::WhiteQueen => Some(Player::White),
            Cell::BlackMan | Cell::BlackQueen => Some(Player::Black)
        }
    }

    /// `true` when no piece stands on the cell.
    #[inline]
    pub fn is_empty(self) -> bool{
        self == Cell::Empty
    }

    /// `true` for a queen of either side.
    #[inline]
    pub fn is_queen(self) -> bool{
        matches!(self, Cell::WhiteQueen | Cell::BlackQueen)
    }
}

/// A board coordinate, 0-based. Equality is by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos{
    pub row: i32,
    pub col: i32
}

impl Pos{
    /// Creates a position. It is not checked against the board bounds.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self{
        Pos { row, col }
    }

    /// Returns the position shifted by `(delta_row, delta_col)`.
    ///
    /// The result may be off the board; check it with [`is_on_board`].
    #[inline]
    pub fn offset(self, delta_row: i32, delta_col: i32) -> Pos{
        Pos { row: self.row + delta_row, col: self.col + delta_col }
    }

    /// `true` for the dark squares the rules engine plays on.
    #[inline]
    pub fn is_dark(self) -> bool{
        (self.row + self.col) % 2 == 1
    }

    /// Dense index of this position. Only meaningful for on-board positions.
    #[inline]
    pub fn index(self) -> usize{
        (self.row * BOARD_SIZE + self.col) as usize
    }
}

/// Checks that both row and column lie in `[0, BOARD_SIZE)`.
#[inline]
pub fn is_on_board(pos: Pos) -> bool{
    (0..BOARD_SIZE).contains(&pos.row) && (0..BOARD_SIZE).contains(&pos.col)
}

/// Errors raised when building a board from external data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError{
    #[error("a board needs exactly 64 cells, got {0}")]
    CellCount(usize)
}

/// Per cell kind counts of a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardStats{
    pub empty: usize,
    pub white_men: usize,
    pub black_men: usize,
    pub white_queens: usize,
    pub black_queens: usize
}

impl BoardStats{
    /// Count for a single cell kind.
    pub fn count(&self, cell: Cell) -> usize{
        match cell {
            Cell::Empty => self.empty,
            Cell::WhiteMan => self.white_men,
            Cell::BlackMan => self.black_men,
            Cell::WhiteQueen => self.white_queens,
            Cell::BlackQueen => self.black_queens
        }
    }

    /// Number of pieces (men and queens) owned by `player`.
    pub fn pieces(&self, player: Player) -> usize{
        match player {
            Player::White => self.white_men + self.white_queens,
            Player::Black => self.black_men + self.black_queens
        }
    }
}

/// Dense grid of cells. Always holds exactly `CELL_COUNT` cells.
///
/// `Board` is `Copy`: every clone is a fully independent position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board{
    cells: [Cell; CELL_COUNT]
}

impl Default for Board{
    fn default() -> Self{
        Board::new()
    }
}

impl Board{
    /// Creates an empty board.
    #[inline]
    pub fn new() -> Self{
        Board { cells: [Cell::Empty; CELL_COUNT] }
    }

    /// Creates a board holding only the given pieces.
    ///
    /// # Parameters
    /// - `pieces`: placements as `(position, cell)`; positions must be on the
    ///   board (checked in debug builds).
    ///
    /// # Examples
    /// ```rust
    /// use draughts_uct::{Board, Cell, Pos};
    /// let board = Board::with_pieces(&[(Pos::new(3, 2), Cell::WhiteMan)]);
    /// assert_eq!(board.get(Pos::new(3, 2)), Cell::WhiteMan);
    /// ```
    pub fn with_pieces(pieces: &[(Pos, Cell)]) -> Self{
        let mut board = Board::new();
        for &(pos, cell) in pieces {
            board.set(pos, cell);
        }
        board
    }

    /// The standard start position: men on the dark squares of the three
    /// back rows of each side. White holds rows 0-2, black rows 5-7.
    pub fn start_position() -> Self{
        let mut board = Board::new();

        for row in 0..BOARD_SIZE {
            let cell = match row {
                0..=2 => Cell::WhiteMan,
                5..=7 => Cell::BlackMan,
                _ => continue
            };

            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row, col);
                if pos.is_dark() {
                    board.set(pos, cell);
                }
            }
        }

        board
    }

    /// Reads a cell. `pos` must be on the board.
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell{
        debug_assert!(is_on_board(pos), "{pos:?} is off the board");
        self.cells[pos.index()]
    }

    /// Writes a cell.
    ///
    /// # Parameters
    /// - `pos`: an on-board position. Off-board positions would alias another
    ///   cell, debug builds panic on them.
    /// - `cell`: the new content.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell){
        debug_assert!(is_on_board(pos), "{pos:?} is off the board");
        self.cells[pos.index()] = cell;
    }

    /// Counts every cell kind on the board.
    pub fn stats(&self) -> BoardStats{
        self.cells.iter().fold(BoardStats::default(), |mut stats, cell|{
            match cell {
                Cell::Empty => stats.empty += 1,
                Cell::WhiteMan => stats.white_men += 1,
                Cell::BlackMan => stats.black_men += 1,
                Cell::WhiteQueen => stats.white_queens += 1,
                Cell::BlackQueen => stats.black_queens += 1
            }
            stats
        })
    }

    /// Occupied positions in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Pos, Cell)> + '_{
        self.cells.iter().enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(index, cell)| {
                let index = index as i32;
                (Pos::new(index / BOARD_SIZE, index % BOARD_SIZE), *cell)
            })
    }
}

impl TryFrom<Vec<Cell>> for Board{
    type Error = BoardError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error>{
        let cells: [Cell; CELL_COUNT] = cells.try_into()
            .map_err(|cells: Vec<Cell>| BoardError::CellCount(cells.len()))?;
        Ok(Board { cells })
    }
}

impl From<Board> for Vec<Cell>{
    fn from(board: Board) -> Self{
        board.cells.to_vec()
    }
}
