//! Game driver: current position, move history and undo

use crate::board::Board;
use crate::legal;
use crate::movegen::MoveList;
use crate::moves::{self, Move};
use crate::status::{self, GameStatus};
use crate::types::{Cell, Color, Coord, CoordParseError};

use std::str::FromStr;

use log::{debug, trace};
use thiserror::Error;

/// Error returned when a move is rejected
///
/// A rejected move never changes the state of the [`MoveChain`].
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    /// Source square is empty
    #[error("no piece on {0}")]
    NoPiece(Coord),
    /// The piece on the source square belongs to the side which is not to move
    #[error("it is not the turn of {0}")]
    WrongSide(Color),
    /// The game is already over
    #[error("game is over: {0}")]
    GameOver(GameStatus),
    /// The piece cannot go to the destination square
    #[error("move {0}{1} is not legal")]
    NotLegal(Coord, Coord),
    /// Square code cannot be parsed
    #[error("bad square: {0}")]
    Coord(#[from] CoordParseError),
}

/// Executed move together with the status it led to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    #[cfg_attr(feature = "serde", serde(flatten))]
    mv: Move,
    status: Option<GameStatus>,
}

impl Record {
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Status of the opponent right after the move
    #[inline]
    pub fn status(&self) -> Option<GameStatus> {
        self.status
    }
}

/// Chess game in progress
///
/// Holds the current position and the list of moves made so far. Moves are added with
/// [`push()`](MoveChain::push) and taken back with [`pop()`](MoveChain::pop).
///
/// # Example
///
/// ```
/// # use owlrules::{MoveChain, GameStatus, Color};
/// #
/// let mut chain = MoveChain::new_initial();
/// for (src, dst) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
///     chain.push_str(src, dst).unwrap();
/// }
/// assert_eq!(chain.status(), Some(GameStatus::Checkmate));
/// assert!(chain.push_str("a2", "a3").is_err());
///
/// let rec = chain.pop().unwrap();
/// assert_eq!(rec.status(), Some(GameStatus::Checkmate));
/// assert_eq!(chain.side(), Color::Black);
/// assert_eq!(chain.status(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChain {
    board: Board,
    status: Option<GameStatus>,
    stack: Vec<Record>,
}

impl MoveChain {
    /// Starts a game from position `b`
    pub fn new(b: Board) -> Self {
        let status = status::calc(&b);
        MoveChain {
            board: b,
            status,
            stack: Vec::new(),
        }
    }

    /// Starts a game from the initial position
    pub fn new_initial() -> Self {
        Self::new(Board::initial())
    }

    /// Returns the current position
    #[inline]
    pub fn last(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.board.side()
    }

    /// Returns the piece on square `c`
    #[inline]
    pub fn piece_at(&self, c: Coord) -> Option<Cell> {
        let cell = self.board.get(c);
        cell.is_occupied().then_some(cell)
    }

    #[inline]
    pub fn is_in_check(&self, c: Color) -> bool {
        self.board.is_in_check(c)
    }

    /// Returns the status of the side to move
    #[inline]
    pub fn status(&self) -> Option<GameStatus> {
        self.status
    }

    /// Returns `true` if the game has ended with checkmate or stalemate
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status.map_or(false, |s| s.is_terminal())
    }

    /// Returns the legal moves of the piece on square `c`
    ///
    /// The list is empty if the square is empty. The moves are generated for the piece on `c`
    /// even if it's not its turn, so the caller can display them.
    pub fn valid_moves(&self, c: Coord) -> MoveList {
        legal::gen_from(&self.board, c)
    }

    /// Number of moves made so far
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterates over the moves made so far, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Record> + ExactSizeIterator + '_ {
        self.stack.iter()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.stack.get(idx)
    }

    /// Returns the most recent move
    #[inline]
    pub fn last_record(&self) -> Option<&Record> {
        self.stack.last()
    }

    /// Returns the pieces captured by side `c`, in the order they were taken
    pub fn captured_by(&self, c: Color) -> impl Iterator<Item = Cell> + '_ {
        self.stack
            .iter()
            .filter(move |r| r.mv.side() == c)
            .filter_map(|r| r.mv.captured())
    }

    fn find_move(&self, src: Coord, dst: Coord) -> Result<Move, MoveError> {
        let side = self
            .board
            .get(src)
            .color()
            .ok_or(MoveError::NoPiece(src))?;
        if side != self.board.side() {
            return Err(MoveError::WrongSide(side));
        }
        if let Some(status) = self.status.filter(GameStatus::is_terminal) {
            return Err(MoveError::GameOver(status));
        }
        legal::gen_from(&self.board, src)
            .find_dst(dst)
            .ok_or(MoveError::NotLegal(src, dst))
    }

    /// Moves the piece from `src` to `dst`
    ///
    /// A pawn reaching the last rank becomes a queen. On success, returns the record which was
    /// appended to the history.
    pub fn push(&mut self, src: Coord, dst: Coord) -> Result<Record, MoveError> {
        let mv = self.find_move(src, dst).map_err(|e| {
            trace!("rejected move {}{}: {}", src, dst, e);
            e
        })?;

        moves::make_move_unchecked(&mut self.board, mv);
        self.status = status::calc(&self.board);
        let rec = Record {
            mv,
            status: self.status,
        };
        self.stack.push(rec);
        debug!(
            "move #{}: {} {} {}{}",
            self.stack.len(),
            mv.side(),
            mv.piece(),
            mv,
            if mv.is_capture() { " (capture)" } else { "" }
        );
        if let Some(status) = self.status.filter(GameStatus::is_terminal) {
            debug!("game over after move #{}: {}", self.stack.len(), status);
        }

        #[cfg(feature = "selftest")]
        self.board.selftest();

        Ok(rec)
    }

    /// Same as [`push()`](MoveChain::push), but takes square codes like `"e2"`
    pub fn push_str(&mut self, src: &str, dst: &str) -> Result<Record, MoveError> {
        let src = Coord::from_str(src)?;
        let dst = Coord::from_str(dst)?;
        self.push(src, dst)
    }

    /// Takes back the most recent move
    ///
    /// Returns `None` if there are no moves to take back.
    pub fn pop(&mut self) -> Option<Record> {
        let rec = self.stack.pop()?;
        moves::unmake_move_unchecked(&mut self.board, rec.mv);
        self.status = status::calc(&self.board);
        debug!("undo move #{}: {}", self.stack.len() + 1, rec.mv);

        #[cfg(feature = "selftest")]
        self.board.selftest();

        Some(rec)
    }

    /// Starts the game over from the initial position
    pub fn reset(&mut self) {
        self.board = Board::initial();
        self.status = None;
        self.stack.clear();
        debug!("reset to the initial position");

        #[cfg(feature = "selftest")]
        self.board.selftest();
    }
}

impl Default for MoveChain {
    fn default() -> Self {
        Self::new_initial()
    }
}
