//! In-process engine backend built on the crate's own move generator.

use std::fmt;
use std::sync::Mutex;
use std::time::Instant;

use tracing::debug;

use crate::chess_errors::ChessResult;
use crate::engines::engine_backend::{EngineBackend, SearchLimits, SearchReport, MAX_SEARCH_DEPTH};
use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::Square;
use crate::game_state::undo_state::UndoRecord;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::{attacks_to_square, is_king_in_check};
use crate::move_generation::legal_move_generator::{
    generate_legal_moves, generate_pseudo_legal_moves,
};
use crate::move_generation::perft::{perft, perft_divide};
use crate::moves::chess_move::Move;
use crate::search::board_scoring::PieceSquareScorer;
use crate::search::cancellation::CancellationToken;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig};
use crate::search::transposition_table::BestMoveTable;
use crate::search::zobrist;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Default)]
pub struct NativeBackend {
    table: Mutex<BestMoveTable>,
    scorer: PieceSquareScorer,
}

impl NativeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_entries(entries: usize) -> Self {
        Self {
            table: Mutex::new(BestMoveTable::with_entries(entries)),
            scorer: PieceSquareScorer,
        }
    }
}

impl fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBackend").finish_non_exhaustive()
    }
}

impl EngineBackend for NativeBackend {
    fn init(&self) {
        zobrist::warm_up();
    }

    fn load_fen(&self, fen: &str) -> ChessResult<BoardState> {
        parse_fen(fen)
    }

    fn to_fen(&self, board: &BoardState) -> String {
        generate_fen(board)
    }

    fn generate_pseudo_legal(&self, board: &BoardState) -> Vec<Move> {
        generate_pseudo_legal_moves(board)
    }

    fn generate_legal(&self, board: &BoardState) -> Vec<Move> {
        generate_legal_moves(board)
    }

    fn is_check(&self, board: &BoardState) -> bool {
        is_king_in_check(board, board.side_to_move)
    }

    fn attacks_to_square(&self, board: &BoardState, square: Square, occupancy: BitSet) -> BitSet {
        attacks_to_square(board, square, occupancy)
    }

    fn make(&self, board: &mut BoardState, mv: Move) -> UndoRecord {
        make_move(board, mv)
    }

    fn unmake(&self, board: &mut BoardState, mv: Move, undo: &UndoRecord) {
        unmake_move(board, mv, undo);
    }

    fn perft(&self, board: &BoardState, depth: u32) -> u64 {
        let mut scratch = board.clone();
        perft(&mut scratch, depth)
    }

    fn perft_divide(&self, board: &BoardState, depth: u32) -> Vec<(Move, u64)> {
        let mut scratch = board.clone();
        perft_divide(&mut scratch, depth)
    }

    fn search(
        &self,
        board: &BoardState,
        limits: &SearchLimits,
        cancel: &CancellationToken,
        debug: bool,
    ) -> SearchReport {
        let max_depth = limits.depth.unwrap_or(MAX_SEARCH_DEPTH);
        let deadline = limits.time_budget.map(|budget| Instant::now() + budget);
        debug!(max_depth, time_budget = ?limits.time_budget, "native search starting");

        // A poisoned table only holds move hints; keep using it.
        let mut table = self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        iterative_deepening_search(
            board,
            &self.scorer,
            &mut table,
            cancel,
            SearchConfig {
                max_depth,
                deadline,
                debug,
            },
        )
    }

    fn clear_search(&self) {
        self.table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}


#[cfg(test)]
mod tests {
    use super::NativeBackend;
    use crate::engines::engine_backend::{EngineBackend, SearchLimits};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::moves::chess_move::Move;
    use crate::search::cancellation::CancellationToken;

    #[test]
    fn fen_round_trips_through_the_backend() {
        let backend = NativeBackend::new();
        backend.init();
        let board = backend.load_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        assert_eq!(backend.to_fen(&board), STARTING_POSITION_FEN);
        assert!(backend.load_fen("not a fen").is_err());
    }

    #[test]
    fn perft_does_not_touch_the_callers_board() {
        let backend = NativeBackend::new();
        let board = backend.load_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        assert_eq!(backend.perft(&board, 3), 8_902);
        assert_eq!(backend.to_fen(&board), STARTING_POSITION_FEN);
    }

    #[test]
    fn depth_limited_search_reports_a_legal_move() {
        let backend = NativeBackend::with_table_entries(1 << 10);
        let board = backend.load_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        let report = backend.search(&board, &SearchLimits::depth(2), &CancellationToken::new(), false);

        let best = Move::decode(report.best_move.expect("start position has moves"));
        assert!(backend.generate_legal(&board).contains(&best));
        assert_eq!(report.depth, 2);
        assert!(report.nodes > 0);
        backend.clear_search();
    }

    #[test]
    fn check_detection_follows_side_to_move() {
        let backend = NativeBackend::new();
        let checked = backend
            .load_fen("4k3/8/8/8/8/8/8/4KR2 b - - 0 1")
            .expect("FEN should parse");
        assert!(!backend.is_check(&checked));
        let checked = backend
            .load_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1")
            .expect("FEN should parse");
        assert!(backend.is_check(&checked));
    }
}
