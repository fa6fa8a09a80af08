//! Legal move generation
//!
//! A pseudo-legal move is legal if it doesn't leave the mover's own king attacked. Each candidate
//! is tried on a scratch copy of the board, so the board passed in is never modified.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::movegen::{self, MaybeMovePush, MoveList, MovePush};
use crate::moves::{self, Move};
use crate::types::Coord;

/// Returns `true` if `mv` doesn't leave the king of its side attacked
///
/// `mv` must be a pseudo-legal move generated for `b`.
pub fn is_legal(b: &Board, mv: Move) -> bool {
    let mut trial = b.clone();
    moves::apply(&mut trial, mv);
    let side = mv.side();
    !movegen::is_cell_attacked(&trial, trial.king_pos(side), side.inv())
}

/// Passes only the legal moves through to `inner`
struct LegalFilter<'a, P> {
    board: &'a Board,
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> MaybeMovePush for LegalFilter<'a, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        if is_legal(self.board, mv) {
            self.inner.push(mv)?;
        }
        Ok(())
    }
}

/// Stops the generation on the first move
struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

/// Adds all the legal moves of the piece on `src` to `dst`
///
/// Does nothing if `src` is empty. Like [`movegen::semilegal::gen_from_into()`], this doesn't
/// take the side to move into account.
pub fn gen_from_into<P: MovePush>(b: &Board, src: Coord, dst: &mut P) {
    let _ = movegen::gen_from_filtered(b, src, &mut LegalFilter { board: b, inner: dst });
}

/// Returns all the legal moves of the piece on `src`
pub fn gen_from(b: &Board, src: Coord) -> MoveList {
    let mut res = MoveList::new();
    gen_from_into(b, src, &mut res);
    res
}

/// Returns all the legal moves of the side to move
pub fn gen_all(b: &Board) -> MoveList {
    let mut res = MoveList::new();
    for src in b.color(b.side()) {
        gen_from_into(b, src, &mut res);
    }
    res
}

/// Returns the squares the piece on `src` can legally move to
pub fn targets(b: &Board, src: Coord) -> Bitboard {
    gen_from(b, src).targets()
}

/// Returns `true` if the side to move has at least one legal move
pub fn has_legal_moves(b: &Board) -> bool {
    b.color(b.side()).into_iter().any(|src| {
        let mut filter = LegalFilter {
            board: b,
            inner: &mut ErrOnFirst,
        };
        movegen::gen_from_filtered(b, src, &mut filter).is_err()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testutil::{board, coord};
    use crate::types::Color;

    fn targets_of(items: &[&str]) -> Bitboard {
        items.iter().map(|s| coord(s)).collect()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(gen_all(&b).len(), 20);
        assert_eq!(targets(&b, coord("e2")), targets_of(&["e3", "e4"]));
        assert!(has_legal_moves(&b));

        let mut v = Vec::new();
        gen_from_into(&b, coord("b1"), &mut v);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_filtered_semilegal() {
        // Pinned knight, checked king and a free bishop all go through the same filter
        let b = board(
            Color::White,
            &[("e1", 'K'), ("e2", 'N'), ("e8", 'r'), ("a8", 'k'), ("d2", 'B'), ("h4", 'b')],
        );
        let mut expected = movegen::semilegal::gen_all(&b);
        expected.retain(|mv| is_legal(&b, *mv));
        assert_eq!(gen_all(&b), expected);

        for src in b.color(Color::White) {
            let mut expected = movegen::semilegal::gen_from(&b, src);
            expected.retain(|mv| is_legal(&b, *mv));
            assert_eq!(gen_from(&b, src), expected);
        }
    }

    #[test]
    fn test_pinned() {
        // Knight on e2 is pinned by the rook on e8
        let b = board(
            Color::White,
            &[("e1", 'K'), ("e2", 'N'), ("e8", 'r'), ("a8", 'k'), ("d2", 'B')],
        );
        assert!(gen_from(&b, coord("e2")).is_empty());
        assert!(!movegen::semilegal::gen_from(&b, coord("e2")).is_empty());

        // Bishop is free to move
        assert_eq!(
            gen_from(&b, coord("d2")),
            movegen::semilegal::gen_from(&b, coord("d2"))
        );
    }

    #[test]
    fn test_king_walk() {
        // King cannot step onto squares attacked by the rook and the pawn
        let b = board(
            Color::White,
            &[("e1", 'K'), ("a2", 'r'), ("f3", 'p'), ("h8", 'k')],
        );
        assert_eq!(targets(&b, coord("e1")), targets_of(&["d1", "f1"]));
    }

    #[test]
    fn test_evasions() {
        // White is in check from the rook; capture, block or step aside
        let b = board(
            Color::White,
            &[
                ("e1", 'K'),
                ("e5", 'r'),
                ("a5", 'R'),
                ("c3", 'B'),
                ("h7", 'N'),
                ("h8", 'k'),
            ],
        );
        assert!(b.is_check());
        let mut all: Vec<String> = gen_all(&b).iter().map(|mv| mv.to_string()).collect();
        all.sort();
        assert_eq!(all, vec!["a5e5", "c3e5", "e1d1", "e1d2", "e1f1", "e1f2"]);
    }

    #[test]
    fn test_source_untouched() {
        let b = board(
            Color::Black,
            &[("e1", 'K'), ("d3", 'q'), ("e8", 'k'), ("h2", 'P')],
        );
        let before = b.clone();
        let _ = gen_all(&b);
        let _ = has_legal_moves(&b);
        let _ = gen_from(&b, coord("e1"));
        assert_eq!(b, before);
    }

    #[test]
    fn test_no_legal_moves() {
        // Black king is stalemated in the corner
        let b = board(Color::Black, &[("a8", 'k'), ("b6", 'Q'), ("h1", 'K')]);
        assert!(!b.is_check());
        assert!(!has_legal_moves(&b));
        assert!(gen_all(&b).is_empty());
        assert!(!movegen::semilegal::gen_all(&b).is_empty());
    }
}
