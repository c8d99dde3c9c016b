//! Transposition table.
//!
//! One slot per index, no buckets. A position's fingerprint is reduced to a
//! slot with a multiply-high range reduction, so any table length works.
//! Different positions landing on the same slot is normal; [`probe`]
//! returns whatever the slot holds and callers check
//! [`TtEntry::matches`] before using any field.
//!
//! Slots are a pair of atomics holding `key ^ data` and `data`. A reader
//! that races a writer recovers a key that does not match its own and
//! treats the slot as foreign.
//!
//! [`probe`]: TranspositionTable::probe

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::search::MATE_BOUND;
use crate::board::{Board, Move};

/// Replacement margin: a non-exact result may displace an entry searched
/// at most this many plies deeper.
pub const REPLACE_DEPTH_MARGIN: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is exact (a PV node).
    Exact,
    /// Score is at least this value (failed high).
    Lower,
    /// Score is at most this value (failed low).
    Upper,
}

impl Bound {
    fn to_bits(self) -> u64 {
        match self {
            Bound::Exact => 1,
            Bound::Lower => 2,
            Bound::Upper => 3,
        }
    }

    fn from_bits(bits: u64) -> Option<Self> {
        match bits & 0x3 {
            1 => Some(Bound::Exact),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Upper),
            _ => None,
        }
    }
}

/// Unpacked contents of one slot.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub key: u64,
    pub best_move: Move,
    pub score: i32,
    pub eval: i32,
    pub depth: u8,
    /// `None` for a slot that was never written.
    pub bound: Option<Bound>,
}

impl TtEntry {
    /// The slot holds a result for the position with fingerprint `hash`.
    #[inline]
    #[must_use]
    pub fn matches(&self, hash: u64) -> bool {
        self.bound.is_some() && self.key == hash
    }

    /// Stored best move, if any.
    #[inline]
    #[must_use]
    pub fn mv(&self) -> Option<Move> {
        (!self.best_move.is_null()).then_some(self.best_move)
    }
}

/// Packed layout:
/// - bits 0-15:  move
/// - bits 16-31: score (i16)
/// - bits 32-47: static eval (i16)
/// - bits 48-55: depth
/// - bits 56-57: bound (0 = empty)
fn pack(best_move: Move, score: i32, eval: i32, depth: u8, bound: Bound) -> u64 {
    let clamp = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16 as u16;
    u64::from(best_move.as_u16())
        | (u64::from(clamp(score)) << 16)
        | (u64::from(clamp(eval)) << 32)
        | (u64::from(depth) << 48)
        | (bound.to_bits() << 56)
}

fn unpack(key: u64, data: u64) -> TtEntry {
    TtEntry {
        key,
        best_move: Move::from_u16((data & 0xFFFF) as u16),
        score: i32::from((data >> 16) as u16 as i16),
        eval: i32::from((data >> 32) as u16 as i16),
        depth: (data >> 48) as u8,
        bound: Bound::from_bits(data >> 56),
    }
}

#[repr(C)]
struct Slot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn new() -> Self {
        Slot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn load(&self) -> TtEntry {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        unpack(key_xor ^ data, data)
    }

    fn write(&self, hash: u64, data: u64) {
        self.data.store(data, Ordering::Relaxed);
        self.key_xor.store(hash ^ data, Ordering::Relaxed);
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn reset(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Fixed-size, single-slot-per-index transposition table.
pub struct TranspositionTable {
    slots: Box<[Slot]>,
}

impl TranspositionTable {
    /// Table using about `size_mb` MiB (at least one slot).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let count = (size_mb * 1024 * 1024 / mem::size_of::<Slot>()).max(1);
        let slots = (0..count).map(|_| Slot::new()).collect::<Vec<_>>();
        TranspositionTable {
            slots: slots.into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        ((u128::from(hash) * self.slots.len() as u128) >> 64) as usize
    }

    /// Contents of the slot `hash` maps to, whoever wrote it.
    #[inline]
    #[must_use]
    pub fn probe(&self, hash: u64) -> TtEntry {
        self.slots[self.index(hash)].load()
    }

    /// Record a search result.
    ///
    /// Exact results always replace. Bounds replace unless the resident
    /// entry was searched more than [`REPLACE_DEPTH_MARGIN`] plies deeper.
    /// `score` must already be adjusted with [`score_to_tt`].
    pub fn store(&self, hash: u64, best_move: Move, score: i32, eval: i32, depth: u8, bound: Bound) {
        let slot = &self.slots[self.index(hash)];
        if bound != Bound::Exact {
            let old = slot.load();
            if old.bound.is_some() && old.depth > depth.saturating_add(REPLACE_DEPTH_MARGIN) {
                return;
            }
        }
        slot.write(hash, pack(best_move, score, eval, depth, bound));
    }

    /// Follow stored best moves from `board` for at most `max_len` plies.
    ///
    /// Replay stops at the first slot that belongs to another position,
    /// holds no move, holds an illegal move, or revisits a position. The
    /// board is returned to where it started.
    pub fn principal_variation(&self, board: &mut Board, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = Vec::with_capacity(max_len);
        while pv.len() < max_len {
            let hash = board.hash();
            if seen.contains(&hash) {
                break;
            }
            seen.push(hash);

            let entry = self.probe(hash);
            if !entry.matches(hash) {
                break;
            }
            let Some(mv) = entry.mv() else { break };
            if !board.is_pseudo_legal(mv) || !board.is_legal(mv) {
                break;
            }
            board.make_move(mv);
            pv.push(mv);
        }
        for _ in 0..pv.len() {
            board.unmake_move();
        }
        pv
    }

    /// Permille of slots in use, sampled from the first thousand.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let used = self.slots[..sample].iter().filter(|s| !s.is_empty()).count();
        (used * 1000 / sample) as u32
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.reset();
        }
    }
}

/// Convert a root-relative mate score to a node-relative one for storage.
#[inline]
#[must_use]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
#[inline]
#[must_use]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn some_move() -> Move {
        Move::normal(Square::E1, Square::from_coords(1, 4))
    }

    #[test]
    fn store_then_probe_returns_fields() {
        let tt = TranspositionTable::new(1);
        let hash = 0x1234_5678_9ABC_DEF0;
        tt.store(hash, some_move(), -512, 37, 9, Bound::Lower);

        let entry = tt.probe(hash);
        assert!(entry.matches(hash));
        assert_eq!(entry.best_move, some_move());
        assert_eq!(entry.score, -512);
        assert_eq!(entry.eval, 37);
        assert_eq!(entry.depth, 9);
        assert_eq!(entry.bound, Some(Bound::Lower));
    }

    #[test]
    fn fresh_slot_matches_nothing() {
        let tt = TranspositionTable::new(1);
        assert!(!tt.probe(0).matches(0));
        assert!(!tt.probe(42).matches(42));
    }

    #[test]
    fn colliding_key_is_rejected_by_caller() {
        let tt = TranspositionTable::new(0);
        assert_eq!(tt.len(), 1);
        tt.store(1, some_move(), 10, 0, 4, Bound::Exact);
        let entry = tt.probe(2);
        assert!(!entry.matches(2));
        assert!(entry.matches(1));
    }

    #[test]
    fn deep_entry_survives_shallow_bound() {
        let tt = TranspositionTable::new(0);
        tt.store(7, some_move(), 100, 0, 12, Bound::Exact);
        tt.store(8, Move::NULL, -5, 0, 2, Bound::Upper);
        assert!(tt.probe(7).matches(7));

        // Within the margin the new bound wins.
        tt.store(9, Move::NULL, -5, 0, 9, Bound::Upper);
        assert!(tt.probe(9).matches(9));

        // Exact always replaces.
        tt.store(10, Move::NULL, 1, 0, 0, Bound::Exact);
        assert!(tt.probe(10).matches(10));
    }

    #[test]
    fn clear_and_hashfull() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.hashfull(), 0);
        for i in 0..50_000u64 {
            tt.store(i.wrapping_mul(0x9E37_79B9_7F4A_7C15), Move::NULL, 0, 0, 1, Bound::Exact);
        }
        assert!(tt.hashfull() > 0);
        tt.clear();
        assert_eq!(tt.hashfull(), 0);
    }

    #[test]
    fn pv_replays_and_restores_board() {
        let tt = TranspositionTable::new(1);
        let mut board = Board::startpos();
        let before = board.clone();

        let line = ["e2e4", "e7e5", "g1f3"];
        for text in line {
            let mv = board.parse_move(text).unwrap();
            tt.store(board.hash(), mv, 0, 0, 5, Bound::Exact);
            board.make_move(mv);
        }
        for _ in line {
            board.unmake_move();
        }

        let pv = tt.principal_variation(&mut board, 10);
        let pv_text: Vec<String> = pv.iter().map(ToString::to_string).collect();
        assert_eq!(pv_text, line);
        assert_eq!(board, before);
        assert!(tt.principal_variation(&mut board, 1).len() == 1);
    }

    #[test]
    fn mate_scores_are_ply_adjusted() {
        let mate_in_3 = crate::board::search::MATE - 5;
        assert_eq!(score_from_tt(score_to_tt(mate_in_3, 4), 4), mate_in_3);
        assert_eq!(score_to_tt(mate_in_3, 2), mate_in_3 + 2);
        assert_eq!(score_to_tt(-mate_in_3, 2), -mate_in_3 - 2);
        assert_eq!(score_to_tt(150, 9), 150);
    }
}
