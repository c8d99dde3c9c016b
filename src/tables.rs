//! Process-wide immutable tables.
//!
//! Attack lookups, Zobrist keys and the late-move reduction table are built
//! once by [`init`]. Hosts should call it before constructing boards; every
//! constructor that needs the tables also calls it, so repeated calls are
//! cheap and always return the same instance.

use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::attack_tables::AttackTables;
use crate::zobrist::ZobristKeys;

/// Fixed seed so hashes and magics are identical between runs.
const TABLE_SEED: u64 = 0x7AC7_1CA5_EED5_0001;

const LMR_DEPTHS: usize = 64;
const LMR_MOVES: usize = 64;

pub struct Tables {
    pub attacks: AttackTables,
    pub zobrist: ZobristKeys,
    lmr: [[u8; LMR_MOVES]; LMR_DEPTHS],
}

impl Tables {
    fn build() -> Self {
        let mut rng = StdRng::seed_from_u64(TABLE_SEED);
        let zobrist = ZobristKeys::generate(&mut rng);
        let attacks = AttackTables::build(&mut rng);

        let mut lmr = [[0u8; LMR_MOVES]; LMR_DEPTHS];
        for (depth, row) in lmr.iter_mut().enumerate().skip(1) {
            for (moves, slot) in row.iter_mut().enumerate().skip(1) {
                let r = 0.75 + (depth as f64).ln() * (moves as f64).ln() / 2.25;
                *slot = r as u8;
            }
        }

        log::debug!("engine tables initialized");
        Tables {
            attacks,
            zobrist,
            lmr,
        }
    }

    /// Base late-move reduction for a depth and a 1-based move count.
    #[inline]
    #[must_use]
    pub fn lmr(&self, depth: i32, move_count: usize) -> i32 {
        let d = (depth.max(0) as usize).min(LMR_DEPTHS - 1);
        let m = move_count.min(LMR_MOVES - 1);
        i32::from(self.lmr[d][m])
    }
}

static TABLES: OnceCell<Tables> = OnceCell::new();

/// Build the shared tables on first call and return them.
pub fn init() -> &'static Tables {
    TABLES.get_or_init(Tables::build)
}
