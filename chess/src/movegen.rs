//! Pseudo-legal move generation and attack detection
//!
//! Moves generated here follow the movement rules of the pieces, but may leave the mover's own
//! king in check. See [`legal`](crate::legal) for generators which filter such moves out.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry;
use crate::moves::{self, Move, MoveKind};
use crate::types::{Color, Coord, Piece};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

pub(crate) trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

/// Fixed-capacity list of moves
///
/// The capacity is large enough to hold all the moves of one side in any reachable position.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, 256>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    /// Returns the move going to `dst`, if there is one
    pub fn find_dst(&self, dst: Coord) -> Option<Move> {
        self.0.iter().copied().find(|mv| mv.dst() == dst)
    }

    /// Returns the set of destination squares
    pub fn targets(&self) -> Bitboard {
        self.0.iter().map(Move::dst).collect()
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        Vec::push(self, m);
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        <Self as MovePush>::push(self, m);
        Ok(())
    }
}

/// Drops the moves which would capture a king
///
/// Raw generation emits such moves, as they are exactly what attack detection looks for. They
/// must never reach the callers though.
struct NoKingCapture<'a, P> {
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> MaybeMovePush for NoKingCapture<'a, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        match mv.captured() {
            Some(cell) if cell.is_piece(Piece::King) => Ok(()),
            _ => self.inner.push(mv),
        }
    }
}

/// Stops the generation as soon as a move lands on `target`
struct AttackProbe {
    target: Coord,
}

impl MaybeMovePush for AttackProbe {
    type Err = ();

    fn push(&mut self, mv: Move) -> Result<(), ()> {
        match mv.dst() == self.target {
            true => Err(()),
            false => Ok(()),
        }
    }
}

struct MoveGenImpl<'a, P> {
    board: &'a Board,
    src: Coord,
    piece: Piece,
    side: Color,
    dst: &'a mut P,
}

impl<'a, P: MaybeMovePush> MoveGenImpl<'a, P> {
    fn new(board: &'a Board, src: Coord, dst: &'a mut P) -> Option<Self> {
        let cell = board.get(src);
        Some(MoveGenImpl {
            board,
            src,
            piece: cell.piece()?,
            side: cell.color()?,
            dst,
        })
    }

    fn add_move(&mut self, kind: MoveKind, dst: Coord) -> Result<(), P::Err> {
        let captured = self.board.get(dst);
        self.dst.push(Move::new_unchecked(
            kind, self.src, dst, self.piece, self.side, captured,
        ))
    }

    fn is_free(&self, c: Coord) -> bool {
        self.board.get(c).is_empty()
    }

    fn is_enemy(&self, c: Coord) -> bool {
        self.board.get(c).color() == Some(self.side.inv())
    }

    fn gen_pawn(&mut self) -> Result<(), P::Err> {
        let forward = geometry::pawn_forward_delta(self.side);

        if let Some(single) = self.src.try_shift(0, forward).filter(|&c| self.is_free(c)) {
            self.add_move(moves::pawn_move_kind(self.side, single), single)?;
            if self.src.rank() == geometry::double_move_src_rank(self.side) {
                if let Some(double) = single.try_shift(0, forward).filter(|&c| self.is_free(c)) {
                    self.add_move(MoveKind::PawnDouble, double)?;
                }
            }
        }

        for side_delta in [-1, 1] {
            if let Some(dst) = self.src.try_shift(side_delta, forward) {
                if self.is_enemy(dst) {
                    self.add_move(moves::pawn_move_kind(self.side, dst), dst)?;
                }
            }
        }
        Ok(())
    }

    fn gen_leaper(&mut self, deltas: &[(isize, isize)]) -> Result<(), P::Err> {
        for &(df, dr) in deltas {
            if let Some(dst) = self.src.try_shift(df, dr) {
                if self.board.get(dst).color() != Some(self.side) {
                    self.add_move(MoveKind::Simple, dst)?;
                }
            }
        }
        Ok(())
    }

    fn gen_slider(&mut self, dirs: &[(isize, isize)]) -> Result<(), P::Err> {
        for &(df, dr) in dirs {
            let mut cur = self.src;
            while let Some(dst) = cur.try_shift(df, dr) {
                match self.board.get(dst).color() {
                    None => self.add_move(MoveKind::Simple, dst)?,
                    Some(color) => {
                        if color != self.side {
                            self.add_move(MoveKind::Simple, dst)?;
                        }
                        break;
                    }
                }
                cur = dst;
            }
        }
        Ok(())
    }

    fn gen(&mut self) -> Result<(), P::Err> {
        match self.piece {
            Piece::Pawn => self.gen_pawn(),
            Piece::Knight => self.gen_leaper(&geometry::KNIGHT_DELTAS),
            Piece::King => self.gen_leaper(&geometry::KING_DELTAS),
            Piece::Bishop => self.gen_slider(&geometry::DIAG_DIRS),
            Piece::Rook => self.gen_slider(&geometry::LINE_DIRS),
            Piece::Queen => {
                self.gen_slider(&geometry::DIAG_DIRS)?;
                self.gen_slider(&geometry::LINE_DIRS)
            }
        }
    }
}

fn gen_raw<P: MaybeMovePush>(b: &Board, src: Coord, dst: &mut P) -> Result<(), P::Err> {
    match MoveGenImpl::new(b, src, dst) {
        Some(mut gen) => gen.gen(),
        None => Ok(()),
    }
}

/// Generates pseudo-legal moves from `src` into `dst`, skipping king captures
pub(crate) fn gen_from_filtered<P: MaybeMovePush>(
    b: &Board,
    src: Coord,
    dst: &mut P,
) -> Result<(), P::Err> {
    gen_raw(b, src, &mut NoKingCapture { inner: dst })
}

pub mod semilegal {
    use super::{gen_from_filtered, MoveList, MovePush};
    use crate::board::Board;
    use crate::types::Coord;

    /// Adds all the pseudo-legal moves of the piece on `src` to `dst`
    ///
    /// Does nothing if `src` is empty. The side to move is not taken into account: the moves are
    /// generated for whichever color occupies `src`.
    pub fn gen_from_into<P: MovePush>(b: &Board, src: Coord, dst: &mut P) {
        let _ = gen_from_filtered(b, src, dst);
    }

    /// Returns all the pseudo-legal moves of the piece on `src`
    pub fn gen_from(b: &Board, src: Coord) -> MoveList {
        let mut res = MoveList::new();
        gen_from_into(b, src, &mut res);
        res
    }

    /// Returns all the pseudo-legal moves of the side to move
    pub fn gen_all(b: &Board) -> MoveList {
        let mut res = MoveList::new();
        for src in b.color(b.side()) {
            gen_from_into(b, src, &mut res);
        }
        res
    }
}

/// Returns `true` if any piece of color `by` has a pseudo-legal move landing on `coord`
pub fn is_cell_attacked(b: &Board, coord: Coord, by: Color) -> bool {
    b.color(by)
        .into_iter()
        .any(|src| gen_raw(b, src, &mut AttackProbe { target: coord }).is_err())
}

/// Returns the squares of all the pieces of color `by` which have a pseudo-legal move landing
/// on `coord`
pub fn cell_attackers(b: &Board, coord: Coord, by: Color) -> Bitboard {
    b.color(by)
        .into_iter()
        .filter(|&src| gen_raw(b, src, &mut AttackProbe { target: coord }).is_err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testutil::{board, coord};
    use crate::types::Cell;
    use std::collections::BTreeSet;

    fn dsts(ml: &MoveList) -> BTreeSet<String> {
        ml.iter().map(|mv| mv.dst().to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(semilegal::gen_all(&b).len(), 20);
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("e2"))), set(&["e3", "e4"]));
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("g1"))), set(&["f3", "h3"]));
        assert!(semilegal::gen_from(&b, coord("a1")).is_empty());
        assert!(semilegal::gen_from(&b, coord("e4")).is_empty());

        // Not the side to move, but moves are still generated
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("d7"))), set(&["d6", "d5"]));
        let kinds: Vec<_> = semilegal::gen_from(&b, coord("d7"))
            .iter()
            .map(|mv| mv.kind())
            .collect();
        assert_eq!(kinds, vec![MoveKind::PawnSimple, MoveKind::PawnDouble]);
    }

    #[test]
    fn test_pawn() {
        let b = board(
            Color::White,
            &[
                ("e1", 'K'),
                ("a8", 'k'),
                ("b2", 'P'),
                ("b4", 'n'),
                ("c3", 'p'),
                ("a3", 'N'),
                ("g2", 'P'),
                ("g3", 'n'),
                ("d7", 'P'),
                ("c8", 'r'),
                ("h5", 'P'),
                ("g6", 'p'),
            ],
        );

        // Double move is blocked, single is not; capture only onto the enemy
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("b2"))), set(&["b3", "c3"]));
        // Blocked in front, nothing to capture
        assert!(semilegal::gen_from(&b, coord("g2")).is_empty());
        // Promotions, with and without capture
        let ml = semilegal::gen_from(&b, coord("d7"));
        assert_eq!(dsts(&ml), set(&["d8", "c8"]));
        assert!(ml.iter().all(|mv| mv.is_promote()));
        assert_eq!(
            ml.find_dst(coord("c8")).and_then(|mv| mv.captured()),
            Some(Cell::from_parts(Color::Black, Piece::Rook))
        );
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("h5"))), set(&["h6", "g6"]));

        // Black pawns go down the board
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("c3"))), set(&["b2", "c2"]));
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("g6"))), set(&["g5", "h5"]));
    }

    #[test]
    fn test_pieces() {
        let b = board(
            Color::White,
            &[
                ("a1", 'K'),
                ("h7", 'k'),
                ("d4", 'Q'),
                ("d6", 'p'),
                ("f4", 'P'),
                ("b1", 'N'),
                ("c3", 'B'),
                ("h1", 'R'),
                ("h4", 'r'),
            ],
        );

        assert_eq!(
            dsts(&semilegal::gen_from(&b, coord("d4"))),
            set(&[
                "d5", "d6", "d3", "d2", "d1", "c4", "b4", "a4", "e4", "e5", "f6", "g7", "h8",
                "e3", "f2", "g1", "c5", "b6", "a7",
            ])
        );
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("b1"))), set(&["a3", "d2"]));
        assert_eq!(
            dsts(&semilegal::gen_from(&b, coord("c3"))),
            set(&["b2", "d2", "e1", "b4", "a5"])
        );
        assert_eq!(
            dsts(&semilegal::gen_from(&b, coord("h1"))),
            set(&["g1", "f1", "e1", "d1", "c1", "h2", "h3", "h4"])
        );
        assert_eq!(dsts(&semilegal::gen_from(&b, coord("a1"))), set(&["a2", "b2"]));
    }

    #[test]
    fn test_no_king_capture() {
        let b = board(Color::White, &[("e1", 'K'), ("e8", 'k'), ("e4", 'r')]);
        assert!(b.is_check());

        // Rook on e4 attacks the white king, but capturing it is never offered
        let ml = semilegal::gen_from(&b, coord("e4"));
        assert!(!ml.targets().has(coord("e1")));
        assert!(ml.targets().has(coord("e2")));
        assert!(is_cell_attacked(&b, coord("e1"), Color::Black));
        assert_eq!(
            cell_attackers(&b, coord("e1"), Color::Black),
            Bitboard::from_coord(coord("e4"))
        );
    }

    #[test]
    fn test_attacks() {
        let b = board(
            Color::White,
            &[
                ("h1", 'K'),
                ("a8", 'k'),
                ("d6", 'R'),
                ("b5", 'N'),
                ("c3", 'P'),
                ("e3", 'P'),
                ("f2", 'B'),
                ("d1", 'R'),
                ("d2", 'p'),
                ("e5", 'Q'),
                ("d4", 'n'),
            ],
        );
        let d4 = coord("d4");
        assert!(is_cell_attacked(&b, d4, Color::White));
        // Bishop on f2 is blocked by its own pawn, rook on d1 by the black pawn
        assert_eq!(
            cell_attackers(&b, d4, Color::White),
            Bitboard::EMPTY
                .with(coord("d6"))
                .with(coord("b5"))
                .with(coord("c3"))
                .with(coord("e3"))
                .with(coord("e5"))
        );
        assert!(!is_cell_attacked(&b, d4, Color::Black));

        assert_eq!(
            cell_attackers(&b, coord("e2"), Color::Black),
            Bitboard::from_coord(d4)
        );
        // Pawns don't capture straight ahead
        assert!(!is_cell_attacked(&b, coord("d1"), Color::Black));
    }
}
