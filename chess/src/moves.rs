//! Moves and the primitives to make and unmake them

use crate::board::Board;
use crate::geometry;
use crate::types::{Cell, Color, Coord, Piece};

use std::fmt;

/// Kind of a move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum MoveKind {
    /// Any non-pawn move
    Simple = 0,
    /// Pawn move or capture which doesn't reach the last rank
    PawnSimple = 1,
    /// Pawn moving two squares forward from its starting rank
    PawnDouble = 2,
    /// Pawn move or capture which reaches the last rank. The pawn turns into a queen
    Promote = 3,
}

/// Candidate or executed move
///
/// Apart from the source and the destination, the move remembers which piece made it and which
/// piece (if any) stood on the destination square, so it can be unmade without any extra data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Move {
    kind: MoveKind,
    #[cfg_attr(feature = "serde", serde(rename = "from"))]
    src: Coord,
    #[cfg_attr(feature = "serde", serde(rename = "to"))]
    dst: Coord,
    piece: Piece,
    #[cfg_attr(feature = "serde", serde(rename = "color"))]
    side: Color,
    captured: Cell,
}

impl Move {
    /// Creates a move without checking it against any board
    ///
    /// Use the move generators in [`movegen`](crate::movegen) and [`legal`](crate::legal) to
    /// obtain moves valid for a given position.
    pub(crate) const fn new_unchecked(
        kind: MoveKind,
        src: Coord,
        dst: Coord,
        piece: Piece,
        side: Color,
        captured: Cell,
    ) -> Move {
        Move {
            kind,
            src,
            dst,
            piece,
            side,
            captured,
        }
    }

    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    pub const fn src(&self) -> Coord {
        self.src
    }

    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Kind of the moving piece, as it was before the move
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    pub const fn side(&self) -> Color {
        self.side
    }

    /// Piece removed from the destination square, if any
    pub const fn captured(&self) -> Option<Cell> {
        if self.captured.is_empty() {
            None
        } else {
            Some(self.captured)
        }
    }

    pub const fn is_capture(&self) -> bool {
        self.captured.is_occupied()
    }

    pub fn is_promote(&self) -> bool {
        self.kind == MoveKind::Promote
    }

    /// Cell which ends up on the destination square after the move
    pub fn dst_cell(&self) -> Cell {
        match self.kind {
            MoveKind::Promote => Cell::from_parts(self.side, Piece::Queen),
            _ => Cell::from_parts(self.side, self.piece),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

/// Relocates the pieces for `mv` and passes the turn, without touching check flags
///
/// This is enough to test whether the mover's king is attacked afterwards, so trial moves on a
/// scratch copy of the board use it directly.
pub(crate) fn apply(b: &mut Board, mv: Move) {
    b.relocate(mv.src, mv.dst);
    if mv.kind == MoveKind::Promote {
        b.put(mv.dst, mv.dst_cell());
    }
    b.set_side(mv.side.inv());
}

/// Makes move `mv` on the board
///
/// The move must be legal on `b`. The check flags are recomputed afterwards.
pub(crate) fn make_move_unchecked(b: &mut Board, mv: Move) {
    debug_assert_eq!(b.get(mv.src), Cell::from_parts(mv.side, mv.piece));
    debug_assert_eq!(b.get(mv.dst), mv.captured);
    apply(b, mv);
    b.update_checks();
}

/// Unmakes move `mv` which was the last move made on `b`
pub(crate) fn unmake_move_unchecked(b: &mut Board, mv: Move) {
    debug_assert_eq!(b.get(mv.dst), mv.dst_cell());
    b.put(mv.dst, mv.captured);
    b.put(mv.src, Cell::from_parts(mv.side, mv.piece));
    b.set_side(mv.side);
    b.update_checks();
}

/// Returns the kind of a pawn move landing on `dst`
pub(crate) fn pawn_move_kind(side: Color, dst: Coord) -> MoveKind {
    if dst.rank() == geometry::promote_dst_rank(side) {
        MoveKind::Promote
    } else {
        MoveKind::PawnSimple
    }
}
