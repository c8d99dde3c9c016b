//! Turning a clock situation into search deadlines.
//!
//! A search gets a soft limit (do not start another iteration) and a hard
//! limit (abandon the running iteration). Both are in milliseconds from
//! the start of the search; zero means unlimited.

use std::time::Duration;

use crate::board::SearchConfig;

/// Moves assumed to remain when the clock does not say.
const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Never plan for fewer moves than this, to avoid spending the whole clock.
const MIN_MOVES_TO_GO: u64 = 10;

/// Below this much usable time, switch to a small fixed fraction.
const LOW_TIME_MS: u64 = 5000;
const LOW_TIME_DIVISOR: u64 = 20;

#[derive(Debug, Clone, Copy)]
pub struct TimeConfig {
    /// Reserved per move for communication latency.
    pub move_overhead_ms: u64,
    /// Soft limit as a percentage of the usable clock.
    pub soft_time_percent: u64,
    /// Hard limit as a percentage of the usable clock.
    pub hard_time_percent: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            move_overhead_ms: 50,
            soft_time_percent: 5,
            hard_time_percent: 20,
        }
    }
}

/// How long the side to move may think.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// Until stopped.
    #[default]
    Infinite,
    /// Fixed time for this move.
    MoveTime { time_ms: u64 },
    /// Remaining clock for the side to move, with increment.
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

impl TimeControl {
    #[must_use]
    pub fn move_time(time: Duration) -> Self {
        TimeControl::MoveTime {
            time_ms: time.as_millis() as u64,
        }
    }

    #[must_use]
    pub fn incremental(time_left: Duration, inc: Duration, movestogo: Option<u64>) -> Self {
        TimeControl::Incremental {
            time_left_ms: time_left.as_millis() as u64,
            inc_ms: inc.as_millis() as u64,
            movestogo,
        }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite)
    }

    /// `(soft_ms, hard_ms)`; `(0, 0)` when unlimited.
    #[must_use]
    pub fn compute_limits(&self, config: &TimeConfig) -> (u64, u64) {
        match *self {
            TimeControl::Infinite => (0, 0),
            TimeControl::MoveTime { time_ms } => {
                let t = time_ms.max(1);
                (t, t)
            }
            TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            } => incremental_limits(time_left_ms, inc_ms, movestogo, config),
        }
    }
}

fn incremental_limits(
    time_left_ms: u64,
    inc_ms: u64,
    movestogo: Option<u64>,
    config: &TimeConfig,
) -> (u64, u64) {
    let usable = time_left_ms.saturating_sub(config.move_overhead_ms);
    if usable == 0 {
        let t = (time_left_ms / 2).max(1);
        return (t, t);
    }

    if usable < LOW_TIME_MS {
        let soft = (usable / LOW_TIME_DIVISOR + inc_ms / 2).clamp(1, usable / 4 + 1);
        let hard = (usable / 3).max(soft);
        return (soft, hard);
    }

    let moves_to_go = movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(MIN_MOVES_TO_GO);
    let base = usable / moves_to_go + inc_ms;
    let soft_cap = usable * config.soft_time_percent / 100;
    let hard_cap = usable * config.hard_time_percent / 100;

    let soft = base.min(soft_cap.max(1)).max(1);
    let hard = hard_cap.max(soft);
    (soft, hard)
}

/// Everything the interface layer can ask a search for.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub time_control: TimeControl,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
}

impl SearchRequest {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchRequest {
            depth: Some(depth),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn move_time(time_ms: u64) -> Self {
        SearchRequest {
            time_control: TimeControl::MoveTime { time_ms },
            ..Default::default()
        }
    }

    /// Search configuration with deadlines worked out from the clock.
    #[must_use]
    pub fn to_config(&self, time: &TimeConfig) -> SearchConfig {
        let (soft, hard) = self.time_control.compute_limits(time);
        let mut config = SearchConfig::default().with_time(soft, hard);
        if let Some(depth) = self.depth {
            config = config.with_depth(depth);
        }
        if let Some(nodes) = self.nodes {
            config = config.with_nodes(nodes);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_has_no_deadlines() {
        assert!(TimeControl::Infinite.is_unlimited());
        assert_eq!(TimeControl::Infinite.compute_limits(&TimeConfig::default()), (0, 0));
    }

    #[test]
    fn move_time_is_used_as_is() {
        let tc = TimeControl::move_time(Duration::from_millis(750));
        assert_eq!(tc.compute_limits(&TimeConfig::default()), (750, 750));
        assert_eq!(
            TimeControl::MoveTime { time_ms: 0 }.compute_limits(&TimeConfig::default()),
            (1, 1)
        );
    }

    #[test]
    fn incremental_limits_are_ordered_and_bounded() {
        let config = TimeConfig::default();
        let tc = TimeControl::incremental(Duration::from_secs(300), Duration::from_secs(3), None);
        let (soft, hard) = tc.compute_limits(&config);
        assert!(soft > 0);
        assert!(soft <= hard);
        assert!(hard < 300_000);
    }

    #[test]
    fn movestogo_spends_more_per_move_when_few_remain() {
        let config = TimeConfig::default();
        let many = TimeControl::incremental(Duration::from_secs(60), Duration::ZERO, Some(40));
        let few = TimeControl::incremental(Duration::from_secs(60), Duration::ZERO, Some(10));
        assert!(few.compute_limits(&config).0 >= many.compute_limits(&config).0);
    }

    #[test]
    fn low_clock_stays_well_inside_remaining_time() {
        let config = TimeConfig::default();
        let tc = TimeControl::incremental(Duration::from_millis(2000), Duration::ZERO, None);
        let (soft, hard) = tc.compute_limits(&config);
        assert!(soft >= 1 && hard <= 2000 / 3);

        let tc = TimeControl::incremental(Duration::from_millis(30), Duration::ZERO, None);
        assert_eq!(tc.compute_limits(&config), (15, 15));
    }

    #[test]
    fn request_becomes_search_config() {
        let mut request = SearchRequest::depth(5);
        request.nodes = Some(10_000);
        let config = request.to_config(&TimeConfig::default());
        assert_eq!(config.max_depth, Some(5));
        assert_eq!(config.node_limit, 10_000);
        assert_eq!(config.hard_time_ms, 0);

        let config = SearchRequest::move_time(200).to_config(&TimeConfig::default());
        assert_eq!((config.soft_time_ms, config.hard_time_ms), (200, 200));
    }
}
