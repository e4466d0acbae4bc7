//! Search control over an injected backend.
//!
//! `Searcher` turns a `SearchLimits` request into one backend search on a
//! scoped worker thread, then decodes the reported move word. It is idle
//! or searching; a second `start` while searching is refused.

use std::panic;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, info};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_backend::{EngineBackend, SearchLimits, DEFAULT_SEARCH_DEPTH};
use crate::game_state::position::Position;
use crate::moves::chess_move::Move;
use crate::search::cancellation::{CancellationToken, StopHandle};

/// Decoded result of one search. `best_move` is `Move::NULL` when the
/// side to move has no legal move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub nodes: u64,
    pub depth: u32,
    pub score: i32,
    pub info: Vec<String>,
}

#[derive(Debug)]
pub struct Searcher {
    backend: Arc<dyn EngineBackend>,
    searching: Arc<AtomicBool>,
    cancel: CancellationToken,
    default_depth: u32,
    debug: bool,
    nodes: AtomicU64,
    last_outcome: Mutex<Option<SearchOutcome>>,
}

/// Returns the searcher to idle when the search ends, even by panic.
struct SearchingGuard<'a> {
    searching: &'a AtomicBool,
    cancel: &'a CancellationToken,
}

impl Drop for SearchingGuard<'_> {
    fn drop(&mut self) {
        self.cancel.reset();
        self.searching.store(false, Ordering::Release);
    }
}

impl Searcher {
    pub fn new(backend: Arc<dyn EngineBackend>) -> Self {
        Self {
            backend,
            searching: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
            default_depth: DEFAULT_SEARCH_DEPTH,
            debug: false,
            nodes: AtomicU64::new(0),
            last_outcome: Mutex::new(None),
        }
    }

    /// Searches `position` and blocks until the backend answers.
    ///
    /// Limits that name nothing fall back to the default depth. The
    /// position is borrowed for the whole search, so it cannot change
    /// underneath the worker.
    pub fn start(&self, position: &Position, limits: SearchLimits) -> ChessResult<SearchOutcome> {
        if limits.depth == Some(0) {
            return Err(ChessError::InvalidDepth(0));
        }
        if self
            .searching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ChessError::AlreadySearching);
        }
        let _guard = SearchingGuard {
            searching: &self.searching,
            cancel: &self.cancel,
        };

        let limits = if limits.is_unbounded() {
            SearchLimits::depth(self.default_depth)
        } else {
            limits
        };
        info!(?limits, fen = %position.to_fen(), "search started");

        let backend = &self.backend;
        let cancel = &self.cancel;
        let debug = self.debug;
        let report = thread::scope(|scope| {
            scope
                .spawn(|| backend.search(position.board(), &limits, cancel, debug))
                .join()
        })
        .unwrap_or_else(|payload| panic::resume_unwind(payload));

        let outcome = SearchOutcome {
            best_move: report.best_move.map_or(Move::NULL, Move::decode),
            nodes: report.nodes,
            depth: report.depth,
            score: report.score,
            info: report.info,
        };
        self.nodes.store(outcome.nodes, Ordering::Relaxed);
        info!(
            best_move = %outcome.best_move,
            depth = outcome.depth,
            nodes = outcome.nodes,
            score = outcome.score,
            "search finished"
        );
        *self
            .last_outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(outcome.clone());
        Ok(outcome)
    }

    /// Cancels a running search. When idle, forgets any stop requested
    /// through a `StopHandle` since the last search.
    pub fn stop(&self) {
        if self.is_searching() {
            debug!("stop requested");
            self.cancel.cancel();
        } else {
            self.cancel.reset();
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(self.cancel.clone(), self.searching.clone())
    }

    /// Resets node counters, the last outcome and backend search caches.
    pub fn clear(&self) {
        self.nodes.store(0, Ordering::Relaxed);
        *self
            .last_outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        if !self.is_searching() {
            self.cancel.reset();
        }
        self.backend.clear_search();
    }

    pub fn set_default_depth(&mut self, depth: u32) -> ChessResult<()> {
        if depth == 0 {
            return Err(ChessError::InvalidDepth(0));
        }
        self.default_depth = depth;
        Ok(())
    }

    pub fn default_depth(&self) -> u32 {
        self.default_depth
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Nodes reported by the last finished search.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    pub fn last_outcome(&self) -> Option<SearchOutcome> {
        self.last_outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::Searcher;
    use crate::chess_errors::ChessError;
    use crate::engines::engine_backend::{EngineBackend, SearchLimits};
    use crate::engines::native_backend::testing::ScriptedBackend;
    use crate::engines::native_backend::NativeBackend;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::game_state::position::Position;
    use crate::moves::chess_move::Move;

    fn scripted(backend: ScriptedBackend) -> (Arc<ScriptedBackend>, Position, Searcher) {
        let backend = Arc::new(backend);
        let shared: Arc<dyn EngineBackend> = backend.clone();
        let position = Position::starting(shared.clone()).expect("start position loads");
        (backend, position, Searcher::new(shared))
    }

    fn e2e4() -> Move {
        Move::quiet(12, 28, Piece::new(PieceKind::Pawn, Color::White))
    }

    #[test]
    fn decodes_the_reported_move_word() {
        let (_, position, searcher) = scripted(ScriptedBackend::answering(Some(e2e4().encode())));
        let outcome = searcher
            .start(&position, SearchLimits::depth(3))
            .expect("search runs");
        assert_eq!(outcome.best_move, e2e4());
        assert_eq!(outcome.best_move.to_uci(), "e2e4");
        assert_eq!(outcome.depth, 3);
        assert_eq!(outcome.nodes, 42);
        assert_eq!(searcher.nodes(), 42);
        assert_eq!(searcher.last_outcome(), Some(outcome));
        assert!(!searcher.is_searching());
    }

    #[test]
    fn no_reported_move_becomes_the_null_move() {
        let (_, position, searcher) = scripted(ScriptedBackend::answering(None));
        let outcome = searcher
            .start(&position, SearchLimits::depth(1))
            .expect("search runs");
        assert!(outcome.best_move.is_null());
        assert_eq!(outcome.best_move.to_uci(), "0000");
    }

    #[test]
    fn zero_depth_is_rejected_before_the_backend_runs() {
        let (backend, position, searcher) = scripted(ScriptedBackend::default());
        assert_eq!(
            searcher.start(&position, SearchLimits::depth(0)),
            Err(ChessError::InvalidDepth(0))
        );
        assert_eq!(backend.searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unbounded_limits_use_the_default_depth() {
        let (backend, position, mut searcher) = scripted(ScriptedBackend::default());
        searcher
            .start(&position, SearchLimits::default())
            .expect("search runs");
        assert_eq!(
            *backend.last_limits.lock().expect("limits lock"),
            Some(SearchLimits::depth(5))
        );

        searcher.set_default_depth(3).expect("positive depth");
        searcher
            .start(&position, SearchLimits::default())
            .expect("search runs");
        assert_eq!(
            *backend.last_limits.lock().expect("limits lock"),
            Some(SearchLimits::depth(3))
        );
        assert_eq!(searcher.set_default_depth(0), Err(ChessError::InvalidDepth(0)));

        let budget = SearchLimits::time(Duration::from_millis(250));
        searcher.start(&position, budget).expect("search runs");
        assert_eq!(*backend.last_limits.lock().expect("limits lock"), Some(budget));
    }

    #[test]
    fn second_start_while_searching_is_refused() {
        let (backend, position, searcher) = scripted(ScriptedBackend::blocking());

        thread::scope(|scope| {
            let running = scope.spawn(|| searcher.start(&position, SearchLimits::depth(4)));
            backend.wait_for_search();

            assert!(searcher.is_searching());
            assert_eq!(
                searcher.start(&position, SearchLimits::depth(2)),
                Err(ChessError::AlreadySearching)
            );

            searcher.stop();
            let outcome = running
                .join()
                .expect("search thread finishes")
                .expect("first search succeeds");
            assert_eq!(outcome.depth, 4);
        });

        assert!(!searcher.is_searching());
        assert_eq!(backend.searches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_handle_cancels_from_another_thread() {
        let (backend, position, searcher) = scripted(ScriptedBackend::blocking());
        let handle = searcher.stop_handle();

        thread::scope(|scope| {
            let running = scope.spawn(|| searcher.start(&position, SearchLimits::default()));
            backend.wait_for_search();
            assert!(handle.is_searching());
            scope.spawn(move || handle.stop());
            running
                .join()
                .expect("search thread finishes")
                .expect("search succeeds");
        });
        assert!(!searcher.is_searching());
    }

    #[test]
    fn idle_stop_discards_a_stale_request() {
        let backend: Arc<dyn EngineBackend> = Arc::new(NativeBackend::with_table_entries(1 << 10));
        let position = Position::starting(backend.clone()).expect("start position loads");
        let searcher = Searcher::new(backend);

        searcher.stop_handle().stop();
        searcher.stop();

        let outcome = searcher
            .start(&position, SearchLimits::depth(2))
            .expect("search runs");
        assert_eq!(outcome.depth, 2);
        assert!(position.moves().contains(&outcome.best_move));
    }

    #[test]
    fn clear_resets_bookkeeping_and_backend_caches() {
        let (backend, position, searcher) = scripted(ScriptedBackend::answering(Some(e2e4().encode())));
        searcher
            .start(&position, SearchLimits::depth(1))
            .expect("search runs");
        assert_eq!(searcher.nodes(), 42);

        searcher.clear();
        assert_eq!(searcher.nodes(), 0);
        assert_eq!(searcher.last_outcome(), None);
        assert_eq!(backend.clears.load(Ordering::SeqCst), 1);
    }
}
