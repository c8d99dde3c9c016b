//! Chess board representation and game logic.
//!
//! Uses bitboards for move generation and attack queries, with an
//! incrementally maintained fingerprint and evaluation. Supports the full
//! rules including castling, en passant, promotions and draw detection.
//!
//! # Example
//! ```
//! use tactica::board::Board;
//!
//! tactica::init();
//! let mut board = Board::new();
//! let moves = board.legal_moves();
//! assert_eq!(moves.len(), 20);
//! ```

pub mod attack_tables;
mod attacks;
mod error;
pub mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod perft;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, PositionError, SquareError};
pub use fen::STARTPOS_FEN;
pub use movegen::GenMode;
pub use state::{Board, MAX_GAME_PLY};
pub use types::castling;
pub use types::{
    Bitboard, BitboardIter, Color, Move, MoveFlag, MoveList, Piece, ScoredMoveList, Square,
    MAX_MOVES, MAX_PLY,
};

pub use search::{
    search, Score, SearchConfig, SearchInfo, SearchInfoCallback, SearchParams, SearchResult,
    SearchState, DEFAULT_TT_MB, DRAW, MATE,
};
