//! Board and related things

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::movegen;
use crate::types::{Cell, Color, Coord, File, Piece, Rank};

use std::fmt;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// The side which is not to move is in check
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Raw chess board
///
/// Raw board contains piece placement and side to move, but, unlike [`Board`], it is not
/// validated and may contain an invalid position. Use it to build positions programmatically,
/// then convert it via [`Board::try_from()`].
///
/// # Example
///
/// ```
/// # use owlrules::{RawBoard, Board, File, Rank, Color, Piece, Cell};
/// #
/// let mut raw = RawBoard::empty();
/// raw.put2(File::B, Rank::R2, Cell::from_parts(Color::White, Piece::King));
/// raw.put2(File::D, Rank::R5, Cell::from_parts(Color::Black, Piece::King));
///
/// let board: Board = raw.try_into().unwrap();
/// assert!(!board.is_check());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    /// Contents of the board, indexed by [`Coord::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
}

impl RawBoard {
    /// Returns an empty board with White to move
    #[inline]
    pub const fn empty() -> RawBoard {
        RawBoard {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> RawBoard {
        let mut res = RawBoard::empty();
        for color in Color::iter() {
            for file in File::iter() {
                let rank = geometry::double_move_src_rank(color);
                res.put2(file, rank, Cell::from_parts(color, Piece::Pawn));
            }
            let rank = geometry::home_rank(color);
            res.put2(File::A, rank, Cell::from_parts(color, Piece::Rook));
            res.put2(File::B, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::C, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::D, rank, Cell::from_parts(color, Piece::Queen));
            res.put2(File::E, rank, Cell::from_parts(color, Piece::King));
            res.put2(File::F, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::G, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::H, rank, Cell::from_parts(color, Piece::Rook));
        }
        res
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// # Example
    ///
    /// ```
    /// # use owlrules::{RawBoard, board::PrettyStyle};
    /// #
    /// let r = RawBoard::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(r.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { raw: self, style }
    }
}

impl Default for RawBoard {
    #[inline]
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

/// Board that contains a valid position
///
/// Alongside the [`RawBoard`], it keeps the occupancy of each color, the locations of both kings
/// and the check flags of both sides. All of them are kept in sync by the move primitives in
/// [`moves`](crate::moves), so the lookups below are O(1).
///
/// The board always has exactly one king of each color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) r: RawBoard,
    white: Bitboard,
    black: Bitboard,
    kings: [Coord; 2],
    checks: [bool; 2],
}

impl Board {
    /// Returns a board with the initial position
    pub fn initial() -> Board {
        Board::index(RawBoard::initial())
    }

    /// Builds the auxiliary structures from `raw`
    ///
    /// `raw` must contain at least one king of each color, otherwise the king locations are
    /// meaningless.
    fn index(raw: RawBoard) -> Board {
        let mut res = Board {
            r: raw,
            white: Bitboard::EMPTY,
            black: Bitboard::EMPTY,
            kings: [Coord::from_index(0); 2],
            checks: [false; 2],
        };
        for coord in Coord::iter() {
            let cell = raw.get(coord);
            if let Some(color) = cell.color() {
                res.color_mut(color).set(coord);
                if cell.is_piece(Piece::King) {
                    res.kings[color.index()] = coord;
                }
            }
        }
        res.update_checks();
        res
    }

    /// Returns a view over the raw board
    #[inline]
    pub fn raw(&self) -> &RawBoard {
        &self.r
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.r.get(c)
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.r.get2(file, rank)
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.r.side
    }

    /// Returns the set of squares occupied by pieces of color `c`
    #[inline]
    pub fn color(&self, c: Color) -> Bitboard {
        match c {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline]
    fn color_mut(&mut self, c: Color) -> &mut Bitboard {
        match c {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Returns the set of all occupied squares
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.white | self.black
    }

    /// Returns the position of the king of color `c`
    #[inline]
    pub fn king_pos(&self, c: Color) -> Coord {
        self.kings[c.index()]
    }

    /// Returns `true` if the king of color `c` is attacked
    #[inline]
    pub fn is_in_check(&self, c: Color) -> bool {
        self.checks[c.index()]
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        self.is_in_check(self.r.side)
    }

    /// Recomputes check flags for both colors
    ///
    /// Only pseudo-legal attacks are considered here, so this never recurses into legality checks.
    pub(crate) fn update_checks(&mut self) {
        for c in Color::iter() {
            self.checks[c.index()] = movegen::is_cell_attacked(self, self.king_pos(c), c.inv());
        }
    }

    /// Puts `cell` to the square `c`, replacing whatever was there
    pub(crate) fn put(&mut self, c: Coord, cell: Cell) {
        if let Some(old) = self.r.get(c).color() {
            self.color_mut(old).unset(c);
        }
        if let Some(color) = cell.color() {
            self.color_mut(color).set(c);
            if cell.is_piece(Piece::King) {
                self.kings[color.index()] = c;
            }
        }
        self.r.put(c, cell);
    }

    /// Moves the contents of `src` to `dst`, leaving `src` empty
    pub(crate) fn relocate(&mut self, src: Coord, dst: Coord) {
        let cell = self.r.get(src);
        self.put(src, Cell::EMPTY);
        self.put(dst, cell);
    }

    #[inline]
    pub(crate) fn set_side(&mut self, side: Color) {
        self.r.side = side;
    }

    /// Verifies that the incremental state matches the state recomputed from scratch
    #[cfg(feature = "selftest")]
    pub(crate) fn selftest(&self) {
        let fresh = Board::index(self.r);
        assert_eq!(self.white, fresh.white, "white occupancy diverged");
        assert_eq!(self.black, fresh.black, "black occupancy diverged");
        assert_eq!(self.kings, fresh.kings, "king locations diverged");
        assert_eq!(self.checks, fresh.checks, "check flags diverged");
        for c in Color::iter() {
            let kings = self
                .color(c)
                .into_iter()
                .filter(|&p| self.get(p).is_piece(Piece::King))
                .count();
            assert_eq!(kings, 1, "expected exactly one king of color {}", c);
        }
    }

    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.r.pretty(style)
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::initial()
    }
}

impl TryFrom<RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: RawBoard) -> Result<Board, ValidateError> {
        for color in Color::iter() {
            let mut pieces = 0;
            let mut kings = 0;
            for coord in Coord::iter() {
                let cell = raw.get(coord);
                if cell.color() != Some(color) {
                    continue;
                }
                pieces += 1;
                match cell.piece() {
                    Some(Piece::King) => kings += 1,
                    Some(Piece::Pawn) if matches!(coord.rank(), Rank::R1 | Rank::R8) => {
                        return Err(ValidateError::InvalidPawn(coord));
                    }
                    _ => {}
                }
            }
            if pieces > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            if kings == 0 {
                return Err(ValidateError::NoKing(color));
            }
            if kings > 1 {
                return Err(ValidateError::TooManyKings(color));
            }
        }

        let res = Board::index(raw);
        if res.is_in_check(raw.side.inv()) {
            return Err(ValidateError::OpponentKingAttacked);
        }
        Ok(res)
    }
}

impl TryFrom<&RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: &RawBoard) -> Result<Board, ValidateError> {
        (*raw).try_into()
    }
}

/// Style for [`RawBoard::pretty()`] and [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

impl PrettyStyle {
    fn frame(&self) -> (char, char, char) {
        match self {
            PrettyStyle::Ascii => ('-', '|', '+'),
            PrettyStyle::Utf8 => ('─', '│', '┼'),
        }
    }

    fn indicator(&self, c: Color) -> char {
        match (self, c) {
            (PrettyStyle::Ascii, Color::White) => 'W',
            (PrettyStyle::Ascii, Color::Black) => 'B',
            (PrettyStyle::Utf8, Color::White) => '○',
            (PrettyStyle::Utf8, Color::Black) => '●',
        }
    }

    fn cell(&self, c: Cell) -> char {
        match self {
            PrettyStyle::Ascii => c.as_char(),
            PrettyStyle::Utf8 => c.as_utf8_char(),
        }
    }
}

/// Wrapper to pretty-print the board
///
/// See docs for [`RawBoard::pretty()`] for more details.
pub struct Pretty<'a> {
    raw: &'a RawBoard,
    style: PrettyStyle,
}

impl<'a> fmt::Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let (horz, vert, angle) = self.style.frame();
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, vert)?;
            for file in File::iter() {
                write!(f, "{}", self.style.cell(self.raw.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", horz, angle)?;
        for _ in File::iter() {
            write!(f, "{}", horz)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", self.style.indicator(self.raw.side), vert)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)
    }
}
