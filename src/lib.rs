//! `tactica`: a bitboard chess engine library.
//!
//! Call [`init`] once before anything else; it builds the attack tables,
//! Zobrist keys and reduction table shared by every [`Board`].
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//! use tactica::board::{search, Board, SearchConfig, SearchState};
//!
//! tactica::init();
//! let mut board = Board::startpos();
//! let mut state = SearchState::new(1);
//! let result = search(&mut board, &mut state, SearchConfig::depth(3), &AtomicBool::new(false));
//! assert!(result.best_move.is_some());
//! ```

pub mod board;
pub mod engine;
pub mod tables;
pub mod tt;
pub mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use tables::{init, Tables};
pub use tt::TranspositionTable;
