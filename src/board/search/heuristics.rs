//! Move-ordering heuristics learned during search.
//!
//! All tables persist across searches and are cleared on a new game.
//! Scores are updated with a gravity formula that keeps them inside
//! `±HISTORY_MAX` without periodic rescaling.

use super::constants::HISTORY_MAX;
use crate::board::{Color, Move, Piece, MAX_PLY};

/// History bonus for a cutoff at `depth`.
#[inline]
#[must_use]
pub fn history_bonus(depth: i32) -> i32 {
    (8 * depth * depth).min(1600)
}

#[inline]
fn apply_gravity(entry: &mut i32, bonus: i32) {
    let bonus = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
    *entry += bonus - *entry * bonus.abs() / HISTORY_MAX;
}

/// Two quiet moves per ply that recently caused a cutoff.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn get(&self, ply: usize) -> [Move; 2] {
        self.slots.get(ply).copied().unwrap_or([Move::NULL; 2])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn clear_ply(&mut self, ply: usize) {
        if let Some(row) = self.slots.get_mut(ply) {
            *row = [Move::NULL; 2];
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

/// Quiet-move history indexed by `[color][from][to]`.
pub struct HistoryTable {
    entries: Box<[i32]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: vec![0; 2 * 64 * 64].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(color: Color, mv: Move) -> usize {
        color.index() * 4096 + mv.from().index() * 64 + mv.to().index()
    }

    #[inline]
    #[must_use]
    pub fn score(&self, color: Color, mv: Move) -> i32 {
        self.entries[Self::index(color, mv)]
    }

    pub fn update(&mut self, color: Color, mv: Move, bonus: i32) {
        apply_gravity(&mut self.entries[Self::index(color, mv)], bonus);
    }

    pub fn reset(&mut self) {
        self.entries.fill(0);
    }
}

/// Capture history indexed by `[attacker][to][victim]`.
pub struct CaptureHistory {
    entries: Box<[i32]>,
}

impl Default for CaptureHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureHistory {
    #[must_use]
    pub fn new() -> Self {
        CaptureHistory {
            entries: vec![0; 6 * 64 * 6].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(attacker: Piece, mv: Move, victim: Piece) -> usize {
        (attacker.index() * 64 + mv.to().index()) * 6 + victim.index()
    }

    #[inline]
    #[must_use]
    pub fn score(&self, attacker: Piece, mv: Move, victim: Piece) -> i32 {
        self.entries[Self::index(attacker, mv, victim)]
    }

    pub fn update(&mut self, attacker: Piece, mv: Move, victim: Piece, bonus: i32) {
        apply_gravity(&mut self.entries[Self::index(attacker, mv, victim)], bonus);
    }

    pub fn reset(&mut self) {
        self.entries.fill(0);
    }
}

/// How well a quiet reply worked against the opponent's previous move,
/// indexed by `[prev_piece][prev_to][piece][to]`.
pub struct CounterMoveHistory {
    entries: Box<[i32]>,
}

impl Default for CounterMoveHistory {
    fn default() -> Self {
        Self::new()
    }
}

const PIECE_SQUARES: usize = 6 * 64;

impl CounterMoveHistory {
    #[must_use]
    pub fn new() -> Self {
        CounterMoveHistory {
            entries: vec![0; PIECE_SQUARES * PIECE_SQUARES].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(prev: (Move, Piece), piece: Piece, mv: Move) -> usize {
        let (prev_mv, prev_piece) = prev;
        (prev_piece.index() * 64 + prev_mv.to().index()) * PIECE_SQUARES
            + piece.index() * 64
            + mv.to().index()
    }

    #[inline]
    #[must_use]
    pub fn score(&self, prev: Option<(Move, Piece)>, piece: Piece, mv: Move) -> i32 {
        prev.map_or(0, |prev| self.entries[Self::index(prev, piece, mv)])
    }

    pub fn update(&mut self, prev: Option<(Move, Piece)>, piece: Piece, mv: Move, bonus: i32) {
        if let Some(prev) = prev {
            apply_gravity(&mut self.entries[Self::index(prev, piece, mv)], bonus);
        }
    }

    pub fn reset(&mut self) {
        self.entries.fill(0);
    }
}

/// Every ordering table the search maintains.
#[derive(Default)]
pub struct Heuristics {
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub capture_history: CaptureHistory,
    pub counter_history: CounterMoveHistory,
}

impl Heuristics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.killers.reset();
        self.history.reset();
        self.capture_history.reset();
        self.counter_history.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn killers_shift_and_ignore_duplicates() {
        let a = Move::normal(Square::A1, Square::B1);
        let b = Move::normal(Square::A1, Square::C1);
        let mut killers = KillerTable::new();
        killers.update(3, a);
        killers.update(3, a);
        assert_eq!(killers.get(3), [a, Move::NULL]);
        killers.update(3, b);
        assert_eq!(killers.get(3), [b, a]);
        killers.update(MAX_PLY + 5, b);
        assert_eq!(killers.get(MAX_PLY + 5), [Move::NULL; 2]);
    }

    #[test]
    fn history_saturates_under_gravity() {
        let mv = Move::normal(Square::A1, Square::B1);
        let mut history = HistoryTable::new();
        for _ in 0..1000 {
            history.update(Color::White, mv, history_bonus(20));
        }
        let score = history.score(Color::White, mv);
        assert!(score > 0 && score <= HISTORY_MAX);
        assert_eq!(history.score(Color::Black, mv), 0);

        for _ in 0..1000 {
            history.update(Color::White, mv, -history_bonus(20));
        }
        assert!(history.score(Color::White, mv) >= -HISTORY_MAX);
        assert!(history.score(Color::White, mv) < 0);
    }

    #[test]
    fn counter_history_needs_a_previous_move() {
        let prev = Move::normal(Square::E8, Square::from_coords(6, 4));
        let mv = Move::normal(Square::E1, Square::from_coords(1, 4));
        let mut table = CounterMoveHistory::new();
        table.update(None, Piece::King, mv, 500);
        assert_eq!(table.score(None, Piece::King, mv), 0);
        table.update(Some((prev, Piece::King)), Piece::King, mv, 500);
        assert_eq!(table.score(Some((prev, Piece::King)), Piece::King, mv), 500);
    }
}
