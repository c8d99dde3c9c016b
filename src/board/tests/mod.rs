//! Board module tests.
//!
//! - `perft.rs` - move generation node counts
//! - `draw.rs` - fifty-move rule, repetition, insufficient material
//! - `make_unmake.rs` - make/unmake restores every piece of state
//! - `eval.rs` - incremental evaluation
//! - `search.rs` - search behaviour on small positions
//! - `proptest.rs` - property-based tests

mod perft;
mod search;
