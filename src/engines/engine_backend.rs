//! Engine backend abstraction.
//!
//! `Position` and `Searcher` never compute attacks, legality or search
//! results themselves: they call an injected `EngineBackend`. The crate
//! ships `NativeBackend`; tests substitute scripted ones.

use std::fmt;
use std::time::Duration;

use crate::chess_errors::ChessResult;
use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::Square;
use crate::game_state::undo_state::UndoRecord;
use crate::moves::chess_move::Move;
use crate::search::cancellation::CancellationToken;

/// Depth used when a request names no limit at all.
pub const DEFAULT_SEARCH_DEPTH: u32 = 5;

/// Depth ceiling for `infinite` and time-bounded searches.
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Bounds for one search request. An empty set of limits means "use the
/// searcher's default depth".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<u32>,
    pub time_budget: Option<Duration>,
    pub infinite: bool,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    pub fn time(budget: Duration) -> Self {
        Self {
            time_budget: Some(budget),
            ..Self::default()
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.depth.is_none() && self.time_budget.is_none() && !self.infinite
    }
}

/// Raw backend search output. `best_move` is an encoded move word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: Option<u32>,
    pub nodes: u64,
    pub depth: u32,
    pub score: i32,
    pub info: Vec<String>,
}

pub trait EngineBackend: Send + Sync + fmt::Debug {
    /// Warms lookup tables. Safe to call more than once.
    fn init(&self);

    fn load_fen(&self, fen: &str) -> ChessResult<BoardState>;
    fn to_fen(&self, board: &BoardState) -> String;

    fn generate_pseudo_legal(&self, board: &BoardState) -> Vec<Move>;
    fn generate_legal(&self, board: &BoardState) -> Vec<Move>;

    /// Whether the side to move is in check.
    fn is_check(&self, board: &BoardState) -> bool;

    /// Pieces of both colours attacking `square`, with `occupancy` as blockers.
    fn attacks_to_square(&self, board: &BoardState, square: Square, occupancy: BitSet) -> BitSet;

    fn make(&self, board: &mut BoardState, mv: Move) -> UndoRecord;
    fn unmake(&self, board: &mut BoardState, mv: Move, undo: &UndoRecord);

    /// Leaf count of the legal move tree `depth` plies deep.
    fn perft(&self, board: &BoardState, depth: u32) -> u64;

    /// Leaf counts below each legal root move.
    fn perft_divide(&self, board: &BoardState, depth: u32) -> Vec<(Move, u64)>;

    fn search(
        &self,
        board: &BoardState,
        limits: &SearchLimits,
        cancel: &CancellationToken,
        debug: bool,
    ) -> SearchReport;

    /// Drops caches that outlive a single search.
    fn clear_search(&self);

    fn move_to_notation(&self, mv: Move) -> String {
        mv.to_uci()
    }
}
