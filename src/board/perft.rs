use super::movegen::GenMode;
use super::state::Board;
use super::types::{Move, MoveList};

impl Board {
    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let mut moves = MoveList::new();
        self.generate_pseudo(GenMode::All, &mut moves);

        let mut nodes = 0;
        for &mv in moves.iter() {
            self.make_move(mv);
            if !self.left_king_in_check() {
                nodes += if depth == 1 { 1 } else { self.perft(depth - 1) };
            }
            self.unmake_move();
        }
        nodes
    }

    /// Perft split by root move, in generation order.
    pub fn divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let moves = self.legal_moves();
        moves
            .iter()
            .map(|&mv| {
                self.make_move(mv);
                let nodes = self.perft(depth - 1);
                self.unmake_move();
                (mv, nodes)
            })
            .collect()
    }
}
