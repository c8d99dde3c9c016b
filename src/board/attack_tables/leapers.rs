//! Precomputed attack tables for leaper pieces (knights, kings, pawns).

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Union of on-board targets reachable from `sq` by the given (rank, file) steps.
fn step_targets(sq: usize, deltas: &[(i8, i8)]) -> u64 {
    let r = (sq / 8) as i8;
    let f = (sq % 8) as i8;
    let mut mask = 0u64;
    for &(dr, df) in deltas {
        let (nr, nf) = (r + dr, f + df);
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            mask |= 1u64 << (nr as usize * 8 + nf as usize);
        }
    }
    mask
}

pub(super) fn knight_table() -> [u64; 64] {
    std::array::from_fn(|sq| step_targets(sq, &KNIGHT_DELTAS))
}

pub(super) fn king_table() -> [u64; 64] {
    std::array::from_fn(|sq| step_targets(sq, &KING_DELTAS))
}

/// Pawn capture targets, indexed `[color][square]`.
pub(super) fn pawn_table() -> [[u64; 64]; 2] {
    [
        std::array::from_fn(|sq| step_targets(sq, &[(1, -1), (1, 1)])),
        std::array::from_fn(|sq| step_targets(sq, &[(-1, -1), (-1, 1)])),
    ]
}
