//! Magic-multiplication lookup for sliding pieces.
//!
//! For every square a relevant-occupancy mask and a multiplier map any
//! blocker subset to a slot in that square's attack table. Multipliers are
//! searched for at build time from a seeded generator, so tables are
//! reproducible between runs.

use rand::rngs::StdRng;
use rand::Rng;

pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Sliding attacks from `sq` by walking each ray until the first blocker.
pub(super) fn ray_attacks(sq: usize, occupancy: u64, dirs: &[(i8, i8)]) -> u64 {
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut r = (sq / 8) as i8 + dr;
        let mut f = (sq % 8) as i8 + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r as usize * 8 + f as usize);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Ray squares whose occupancy can change the attack set (board edges excluded).
fn relevant_mask(sq: usize, dirs: &[(i8, i8)]) -> u64 {
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let mut r = (sq / 8) as i8 + dr;
        let mut f = (sq % 8) as i8 + df;
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r as usize * 8 + f as usize);
            r += dr;
            f += df;
        }
    }
    mask
}

#[derive(Clone, Copy, Debug)]
struct Magic {
    mask: u64,
    multiplier: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    #[inline(always)]
    fn index(&self, occupancy: u64) -> usize {
        self.offset + ((occupancy & self.mask).wrapping_mul(self.multiplier) >> self.shift) as usize
    }
}

/// Per-square magics plus one flattened attack table shared by all squares.
pub(super) struct SliderTable {
    magics: [Magic; 64],
    attacks: Vec<u64>,
}

impl SliderTable {
    pub(super) fn build(dirs: &[(i8, i8)], rng: &mut StdRng) -> Self {
        let mut attacks = Vec::new();
        let magics = std::array::from_fn(|sq| {
            let (mut magic, table) = find_magic(sq, dirs, rng);
            magic.offset = attacks.len();
            attacks.extend_from_slice(&table);
            magic
        });
        SliderTable { magics, attacks }
    }

    #[inline(always)]
    pub(super) fn attacks(&self, sq: usize, occupancy: u64) -> u64 {
        self.attacks[self.magics[sq].index(occupancy)]
    }
}

/// Search for a collision-free multiplier for `sq`, returning it with its
/// filled attack table.
fn find_magic(sq: usize, dirs: &[(i8, i8)], rng: &mut StdRng) -> (Magic, Vec<u64>) {
    let mask = relevant_mask(sq, dirs);
    let bits = mask.count_ones();
    let size = 1usize << bits;
    let shift = 64 - bits;

    // Carry-rippler enumeration of every subset of the mask.
    let mut occupancies = Vec::with_capacity(size);
    let mut reference = Vec::with_capacity(size);
    let mut subset = 0u64;
    loop {
        occupancies.push(subset);
        reference.push(ray_attacks(sq, subset, dirs));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    let mut table = vec![0u64; size];
    let mut epoch = vec![0u32; size];
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let multiplier = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(multiplier) >> 56).count_ones() < 6 {
            continue;
        }

        let mut collision = false;
        for (occ, &attack) in occupancies.iter().zip(&reference) {
            let idx = (occ.wrapping_mul(multiplier) >> shift) as usize;
            if epoch[idx] != attempt {
                epoch[idx] = attempt;
                table[idx] = attack;
            } else if table[idx] != attack {
                collision = true;
                break;
            }
        }

        if !collision {
            let magic = Magic {
                mask,
                multiplier,
                shift,
                offset: 0,
            };
            return (magic, table);
        }
    }
}
