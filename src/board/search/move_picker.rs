//! Staged, lazy move ordering.
//!
//! The picker hands out one pseudo-legal move per call. Work for a stage
//! (generation, scoring) is only done once every earlier stage is used up,
//! so a cutoff on the hash move costs no move generation at all.

use super::heuristics::Heuristics;
use crate::board::{Board, GenMode, Move, MoveList, Piece, ScoredMoveList};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    HashMove,
    GenerateNoisy,
    GoodNoisy,
    Killer1,
    Killer2,
    BadNoisy,
    GenerateQuiet,
    Quiet,
    Exhausted,
}

/// Piece captured by `mv`, counting en passant. Quiet promotions map to
/// the pawn slot.
#[inline]
pub(crate) fn captured_piece(board: &Board, mv: Move) -> Piece {
    if mv.is_en_passant() {
        return Piece::Pawn;
    }
    board.piece_at(mv.to()).map_or(Piece::Pawn, |(_, piece)| piece)
}

#[inline]
pub(crate) fn moved_piece(board: &Board, mv: Move) -> Piece {
    board.piece_at(mv.from()).map_or(Piece::Pawn, |(_, piece)| piece)
}

pub struct MovePicker {
    stage: Stage,
    hash_move: Move,
    killers: [Move; 2],
    prev: Option<(Move, Piece)>,
    good_noisy: ScoredMoveList,
    bad_noisy: ScoredMoveList,
    quiet: ScoredMoveList,
    cursor: usize,
    skip_quiets: bool,
    noisy_only: bool,
}

impl MovePicker {
    /// Picker for an interior node.
    #[must_use]
    pub fn new(hash_move: Move, killers: [Move; 2], prev: Option<(Move, Piece)>) -> Self {
        MovePicker {
            stage: Stage::HashMove,
            hash_move,
            killers,
            prev,
            good_noisy: ScoredMoveList::new(),
            bad_noisy: ScoredMoveList::new(),
            quiet: ScoredMoveList::new(),
            cursor: 0,
            skip_quiets: false,
            noisy_only: false,
        }
    }

    /// Picker for quiescence: noisy moves only, no hash move or killers.
    #[must_use]
    pub fn noisy(hash_move: Move) -> Self {
        let mut picker = Self::new(hash_move, [Move::NULL; 2], None);
        picker.noisy_only = true;
        picker.skip_quiets = true;
        picker
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stop serving quiet moves (killers included) from now on.
    pub fn skip_quiets(&mut self) {
        self.skip_quiets = true;
    }

    /// Next move to try, or `None` once every stage is exhausted.
    pub fn next(&mut self, board: &Board, heuristics: &Heuristics) -> Option<Move> {
        loop {
            match self.stage {
                Stage::HashMove => {
                    self.stage = Stage::GenerateNoisy;
                    let mv = self.hash_move;
                    if board.is_pseudo_legal(mv) && (!self.noisy_only || board.is_noisy(mv)) {
                        return Some(mv);
                    }
                    self.hash_move = Move::NULL;
                }
                Stage::GenerateNoisy => {
                    self.score_noisy(board, heuristics);
                    self.cursor = 0;
                    self.stage = Stage::GoodNoisy;
                }
                Stage::GoodNoisy => {
                    if let Some((mv, _)) = self.good_noisy.pick_best(self.cursor) {
                        self.cursor += 1;
                        return Some(mv);
                    }
                    self.cursor = 0;
                    self.stage = Stage::Killer1;
                }
                Stage::Killer1 | Stage::Killer2 => {
                    let slot = usize::from(self.stage == Stage::Killer2);
                    self.stage = if slot == 0 {
                        Stage::Killer2
                    } else {
                        Stage::BadNoisy
                    };
                    let mv = self.killers[slot];
                    if !self.skip_quiets
                        && mv != self.hash_move
                        && (slot == 0 || mv != self.killers[0])
                        && board.is_pseudo_legal(mv)
                        && board.is_quiet(mv)
                    {
                        return Some(mv);
                    }
                    // Not served; make sure the quiet stage does not skip it.
                    self.killers[slot] = Move::NULL;
                }
                Stage::BadNoisy => {
                    if let Some((mv, _)) = self.bad_noisy.pick_best(self.cursor) {
                        self.cursor += 1;
                        return Some(mv);
                    }
                    self.stage = if self.noisy_only {
                        Stage::Exhausted
                    } else {
                        Stage::GenerateQuiet
                    };
                }
                Stage::GenerateQuiet => {
                    if self.skip_quiets {
                        self.stage = Stage::Exhausted;
                        continue;
                    }
                    self.score_quiet(board, heuristics);
                    self.cursor = 0;
                    self.stage = Stage::Quiet;
                }
                Stage::Quiet => {
                    if self.skip_quiets {
                        self.stage = Stage::Exhausted;
                        continue;
                    }
                    if let Some((mv, _)) = self.quiet.pick_best(self.cursor) {
                        self.cursor += 1;
                        return Some(mv);
                    }
                    self.stage = Stage::Exhausted;
                }
                Stage::Exhausted => return None,
            }
        }
    }

    fn score_noisy(&mut self, board: &Board, heuristics: &Heuristics) {
        let mut moves = MoveList::new();
        board.generate_pseudo(GenMode::Noisy, &mut moves);
        for &mv in moves.iter() {
            if mv == self.hash_move {
                continue;
            }
            let see = board.see(mv);
            let history = heuristics.capture_history.score(
                moved_piece(board, mv),
                mv,
                captured_piece(board, mv),
            );
            let score = see + history / 32;
            if see >= 0 {
                self.good_noisy.push(mv, score);
            } else {
                self.bad_noisy.push(mv, score);
            }
        }
    }

    fn score_quiet(&mut self, board: &Board, heuristics: &Heuristics) {
        let mut moves = MoveList::new();
        board.generate_pseudo(GenMode::Quiet, &mut moves);
        let side = board.side_to_move();
        for &mv in moves.iter() {
            if mv == self.hash_move || self.killers.contains(&mv) {
                continue;
            }
            let score = heuristics.history.score(side, mv)
                + heuristics
                    .counter_history
                    .score(self.prev, moved_piece(board, mv), mv);
            self.quiet.push(mv, score);
        }
    }
}
