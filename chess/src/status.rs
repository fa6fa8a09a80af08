//! Check, checkmate and stalemate detection

use crate::board::Board;
use crate::legal;
use crate::types::Color;

use derive_more::Display;

/// Status of the side to move
///
/// A position in which the side to move is not in check and has legal moves has no status at
/// all, see [`calc()`].
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GameStatus {
    /// The king is attacked, but there are moves to escape
    #[display(fmt = "check")]
    Check,
    /// The king is attacked and there are no legal moves
    #[display(fmt = "checkmate")]
    Checkmate,
    /// The king is not attacked, but there are no legal moves
    #[display(fmt = "stalemate")]
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if no more moves can be made
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }

    /// Returns the winner, given that `side` is the side to move
    ///
    /// Only checkmate has a winner.
    #[inline]
    pub fn winner(&self, side: Color) -> Option<Color> {
        match self {
            GameStatus::Checkmate => Some(side.inv()),
            GameStatus::Check | GameStatus::Stalemate => None,
        }
    }
}

/// Computes the status of the side to move on `b`
pub fn calc(b: &Board) -> Option<GameStatus> {
    match (b.is_check(), legal::has_legal_moves(b)) {
        (true, true) => Some(GameStatus::Check),
        (true, false) => Some(GameStatus::Checkmate),
        (false, false) => Some(GameStatus::Stalemate),
        (false, true) => None,
    }
}

impl Board {
    /// Computes the status of the side to move
    ///
    /// This is a shorthand for [`calc()`].
    #[inline]
    pub fn calc_status(&self) -> Option<GameStatus> {
        calc(self)
    }
}
