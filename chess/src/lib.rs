//! # owlrules
//!
//! Rules engine for a two-player game of chess: board representation, legal move generation,
//! check, checkmate and stalemate detection, and a game driver which makes and takes back moves.
//!
//! Castling, en passant and draw rules are not supported. Pawns are always promoted to a queen.
//!
//! # Example
//!
//! ```
//! use owlrules::{Cell, Color, Coord, MoveChain, MoveError, Piece};
//! use std::str::FromStr;
//!
//! let mut chain = MoveChain::new_initial();
//!
//! // Legal moves of the pawn on e2
//! let e2 = Coord::from_str("e2").unwrap();
//! assert_eq!(chain.valid_moves(e2).len(), 2);
//!
//! // Make a move
//! let rec = chain.push_str("e2", "e4").unwrap();
//! assert_eq!(rec.mv().piece(), Piece::Pawn);
//! assert_eq!(chain.side(), Color::Black);
//!
//! // Illegal moves are rejected and don't change anything
//! assert!(matches!(chain.push_str("d7", "d3"), Err(MoveError::NotLegal(_, _))));
//!
//! // Take the move back
//! chain.pop().unwrap();
//! assert_eq!(chain.piece_at(e2), Some(Cell::from_parts(Color::White, Piece::Pawn)));
//! ```

pub mod board;
pub mod chain;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod status;

pub use owlrules_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::{Board, RawBoard};
pub use chain::{MoveChain, MoveError, Record};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind};
pub use status::GameStatus;
pub use types::{Cell, Color, Coord, File, Piece, Rank};
