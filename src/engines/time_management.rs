//! Turns `go` clock parameters into search limits.
//!
//! The protocol layer passes raw clock data (`wtime/btime/winc/binc/movetime`)
//! and the number of `go` requests seen this game; the budget rule lives here.

use std::time::Duration;

use crate::engines::engine_backend::SearchLimits;
use crate::game_state::chess_types::Color;

/// Remaining time is spread over this many moves.
pub const MOVES_TO_GO: f64 = 40.0;
/// Never plan to spend more than `remaining / RESERVE_DIVISOR - 1` seconds.
pub const RESERVE_DIVISOR: f64 = 2.0;
/// Opening moves think for at most this long.
pub const OPENING_CAP_SECS: f64 = 1.0;
pub const OPENING_CAPPED_MOVES: u32 = 3;
/// Held back from a fixed `movetime`.
pub const MOVETIME_MARGIN_SECS: f64 = 0.1;
pub const MIN_BUDGET: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub infinite: bool,
}

/// Think time in seconds for the side to move, or `None` when no clock
/// data was given. `move_number` counts `go` requests from 1.
pub fn think_seconds(params: &GoParams, side: Color, move_number: u32) -> Option<f64> {
    if let Some(movetime) = params.movetime_ms {
        return Some(movetime as f64 / 1000.0 - MOVETIME_MARGIN_SECS);
    }

    let (remaining, increment) = match side {
        Color::White => (params.wtime_ms?, params.winc_ms),
        Color::Black => (params.btime_ms?, params.binc_ms),
    };
    let remaining = remaining as f64 / 1000.0;
    let increment = increment.unwrap_or(0) as f64 / 1000.0;

    let think = (remaining / MOVES_TO_GO + increment).min(remaining / RESERVE_DIVISOR - 1.0);
    if move_number <= OPENING_CAPPED_MOVES {
        Some(think.min(OPENING_CAP_SECS))
    } else {
        Some(think)
    }
}

/// Think time as a duration, floored at `MIN_BUDGET`.
pub fn time_budget(params: &GoParams, side: Color, move_number: u32) -> Option<Duration> {
    think_seconds(params, side, move_number).map(|secs| {
        Duration::try_from_secs_f64(secs)
            .unwrap_or(Duration::ZERO)
            .max(MIN_BUDGET)
    })
}

pub fn resolve_search_limits(params: &GoParams, side: Color, move_number: u32) -> SearchLimits {
    SearchLimits {
        depth: params.depth,
        time_budget: if params.infinite {
            None
        } else {
            time_budget(params, side, move_number)
        },
        infinite: params.infinite,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn clock(wtime: u64, winc: u64) -> GoParams {
        GoParams {
            wtime_ms: Some(wtime),
            btime_ms: Some(wtime),
            winc_ms: Some(winc),
            binc_ms: Some(winc),
            ..GoParams::default()
        }
    }

    #[test]
    fn one_fortieth_of_the_clock_after_the_opening() {
        let think = think_seconds(&clock(60_000, 0), Color::White, 5).expect("clock given");
        assert!((think - 1.5).abs() < 1e-9);
    }

    #[test]
    fn opening_moves_are_capped() {
        for move_number in 1..=3 {
            let think = think_seconds(&clock(60_000, 0), Color::White, move_number)
                .expect("clock given");
            assert!(think <= 1.0, "move {move_number} thinks {think}");
        }
        let think = think_seconds(&clock(60_000, 0), Color::White, 4).expect("clock given");
        assert!(think > 1.0);
    }

    #[test]
    fn increment_is_added_but_reserve_wins_when_short() {
        let think = think_seconds(&clock(60_000, 2_000), Color::Black, 10).expect("clock given");
        assert!((think - 3.5).abs() < 1e-9);

        let think = think_seconds(&clock(3_000, 5_000), Color::White, 10).expect("clock given");
        assert!((think - 0.5).abs() < 1e-9);
    }

    #[test]
    fn movetime_overrides_the_clock() {
        let params = GoParams {
            movetime_ms: Some(2_000),
            ..clock(600_000, 0)
        };
        let think = think_seconds(&params, Color::White, 1).expect("movetime given");
        assert!((think - 1.9).abs() < 1e-9);
    }

    #[test]
    fn budget_never_reaches_zero() {
        let params = GoParams {
            movetime_ms: Some(50),
            ..GoParams::default()
        };
        assert_eq!(time_budget(&params, Color::White, 1), Some(MIN_BUDGET));
        assert_eq!(time_budget(&clock(500, 0), Color::White, 9), Some(MIN_BUDGET));
        assert_eq!(time_budget(&GoParams::default(), Color::White, 1), None);
    }

    #[test]
    fn limits_follow_the_go_parameters() {
        let infinite = GoParams {
            infinite: true,
            ..clock(60_000, 0)
        };
        let limits = resolve_search_limits(&infinite, Color::White, 7);
        assert!(limits.infinite);
        assert_eq!(limits.time_budget, None);

        let depth = GoParams {
            depth: Some(6),
            ..GoParams::default()
        };
        assert_eq!(resolve_search_limits(&depth, Color::White, 1), SearchLimits::depth(6));

        let limits = resolve_search_limits(&clock(60_000, 0), Color::White, 5);
        let budget = limits.time_budget.expect("clock gives a budget");
        assert!(budget >= Duration::from_millis(1_499) && budget <= Duration::from_millis(1_500));
    }
}
