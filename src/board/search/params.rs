/// Tunable pruning margins and thresholds.
#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Reverse futility pruning applies at depth <= this.
    pub rfp_max_depth: i32,
    /// Margin per ply of depth.
    pub rfp_margin: i32,
    /// Null-move pruning needs at least this depth.
    pub nmp_min_depth: i32,
    pub nmp_base_reduction: i32,
    /// One extra ply of reduction per this many plies of depth.
    pub nmp_depth_divisor: i32,
    /// One extra ply of reduction per this much eval above beta (max 3).
    pub nmp_eval_divisor: i32,
    /// Late-move pruning applies at depth <= this.
    pub lmp_max_depth: i32,
    /// Quiet moves allowed at depth 1 before pruning.
    pub lmp_base: usize,
    /// SEE pruning applies at depth <= this.
    pub see_max_depth: i32,
    /// Captures losing more than this per ply of depth are pruned.
    pub see_noisy_margin: i32,
    /// Late-move reductions start at this depth.
    pub lmr_min_depth: i32,
    /// Moves searched before reductions start.
    pub lmr_min_moves: usize,
    /// History score per ply of reduction removed or added.
    pub lmr_history_divisor: i32,
    pub aspiration_min_depth: u32,
    pub aspiration_delta: i32,
    /// Internal iterative reduction needs at least this depth.
    pub iir_min_depth: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            rfp_max_depth: 7,
            rfp_margin: 75,
            nmp_min_depth: 3,
            nmp_base_reduction: 3,
            nmp_depth_divisor: 3,
            nmp_eval_divisor: 200,
            lmp_max_depth: 8,
            lmp_base: 3,
            see_max_depth: 8,
            see_noisy_margin: 100,
            lmr_min_depth: 3,
            lmr_min_moves: 2,
            lmr_history_divisor: 8192,
            aspiration_min_depth: 4,
            aspiration_delta: 25,
            iir_min_depth: 4,
        }
    }
}
