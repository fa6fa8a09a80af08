//! # Base types for owlrules
//!
//! This is an auxiliary crate for `owlrules`, which contains plain value types: squares, colors,
//! pieces, bitboards and a bit of board geometry. Nothing here knows the rules of the game.
//!
//! Normally you don't want to use this crate directly. Use `owlrules` instead, which re-exports
//! everything declared here.

pub mod bitboard;
pub mod geometry;
pub mod types;
