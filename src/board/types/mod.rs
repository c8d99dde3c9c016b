//! Core value types shared by the board, move generator and search.

mod bitboard;
pub mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use moves::{Move, MoveFlag, MoveList, ScoredMoveList, MAX_MOVES, MAX_PLY};
pub use piece::{Color, Piece};
pub use square::Square;
