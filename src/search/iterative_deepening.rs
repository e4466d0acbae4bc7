//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each iteration searches one ply deeper than the last, trying the
//! previous best move first. Cancellation and the deadline are polled every
//! 1024 nodes; an interrupted iteration is discarded and the last completed
//! one is reported. When interrupted before depth 1 finishes, the first
//! ordered root move is returned so a legal position never yields no move.

use std::time::Instant;

use tracing::debug;

use crate::engines::engine_backend::SearchReport;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_rules::FIFTY_MOVE_HALFMOVES;
use crate::game_state::chess_types::PieceKind;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves_in_place;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{piece_value, BoardScorer, MATE_SCORE, MATE_THRESHOLD};
use crate::search::cancellation::CancellationToken;
use crate::search::transposition_table::BestMoveTable;

const POLL_MASK: u64 = 1023;
const MAX_PLY: u32 = 128;
const HASH_MOVE_BONUS: i32 = 1_000_000;
const TACTICAL_BONUS: i32 = 100_000;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub deadline: Option<Instant>,
    pub debug: bool,
}

struct SearchContext<'a, S: BoardScorer> {
    board: BoardState,
    scorer: &'a S,
    table: &'a mut BestMoveTable,
    cancel: &'a CancellationToken,
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
}

pub fn iterative_deepening_search<S: BoardScorer>(
    board: &BoardState,
    scorer: &S,
    table: &mut BestMoveTable,
    cancel: &CancellationToken,
    config: SearchConfig,
) -> SearchReport {
    let started = Instant::now();
    let mut ctx = SearchContext {
        board: board.clone(),
        scorer,
        table,
        cancel,
        deadline: config.deadline,
        nodes: 0,
        aborted: false,
    };

    let mut root_moves = generate_legal_moves_in_place(&mut ctx.board);
    if root_moves.is_empty() {
        return SearchReport {
            best_move: None,
            nodes: 1,
            depth: 0,
            score: ctx.terminal_score(0),
            info: Vec::new(),
        };
    }

    let mut report = SearchReport::default();
    ctx.order_moves(&mut root_moves);
    report.best_move = Some(root_moves[0].encode());

    for depth in 1..=config.max_depth.max(1) {
        if ctx.should_stop() {
            break;
        }

        let (best, score) = ctx.search_root(&mut root_moves, depth);
        if ctx.aborted {
            debug!(depth, nodes = ctx.nodes, "search iteration interrupted");
            break;
        }

        report.best_move = Some(best.encode());
        report.score = score;
        report.depth = depth;

        if config.debug {
            report.info.push(format!(
                "info depth {depth} score {} nodes {} time {} pv {}",
                format_score(score),
                ctx.nodes,
                started.elapsed().as_millis(),
                best.to_uci()
            ));
        }

        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    report.nodes = ctx.nodes;
    report
}

/// `cp N` or `mate N` (negative when the side to move is being mated).
pub fn format_score(score: i32) -> String {
    if score >= MATE_THRESHOLD {
        format!("mate {}", (MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_THRESHOLD {
        format!("mate -{}", (MATE_SCORE + score) / 2)
    } else {
        format!("cp {score}")
    }
}

impl<S: BoardScorer> SearchContext<'_, S> {
    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    #[inline]
    fn visit(&mut self) {
        self.nodes += 1;
        if self.nodes & POLL_MASK == 0 && self.should_stop() {
            self.aborted = true;
        }
    }

    fn terminal_score(&self, ply: u32) -> i32 {
        if is_king_in_check(&self.board, self.board.side_to_move) {
            -MATE_SCORE + ply as i32
        } else {
            0
        }
    }

    fn search_root(&mut self, moves: &mut [Move], depth: u32) -> (Move, i32) {
        self.order_moves(moves);

        let mut alpha = -MATE_SCORE;
        let beta = MATE_SCORE;
        let mut best = moves[0];
        let mut best_score = -MATE_SCORE;

        for &mv in moves.iter() {
            let undo = make_move(&mut self.board, mv);
            let score = -self.negamax(depth - 1, -beta, -alpha, 1);
            unmake_move(&mut self.board, mv, &undo);

            if self.aborted {
                break;
            }
            if score > best_score {
                best_score = score;
                best = mv;
            }
            alpha = alpha.max(score);
        }

        if !self.aborted {
            self.table.store(self.board.hash, depth, best.encode());
        }
        (best, best_score)
    }

    fn negamax(&mut self, depth: u32, mut alpha: i32, beta: i32, ply: u32) -> i32 {
        self.visit();
        if self.aborted {
            return 0;
        }
        if self.board.halfmove_clock >= FIFTY_MOVE_HALFMOVES || self.board.repetitions() > 0 {
            return 0;
        }
        if depth == 0 || ply >= MAX_PLY {
            return self.quiescence(alpha, beta, ply);
        }

        let mut moves = generate_legal_moves_in_place(&mut self.board);
        if moves.is_empty() {
            return self.terminal_score(ply);
        }
        self.order_moves(&mut moves);

        let mut best = -MATE_SCORE;
        let mut best_move = moves[0];
        for mv in moves {
            let undo = make_move(&mut self.board, mv);
            let score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
            unmake_move(&mut self.board, mv, &undo);

            if self.aborted {
                return 0;
            }
            if score > best {
                best = score;
                best_move = mv;
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        self.table.store(self.board.hash, depth, best_move.encode());
        best
    }

    fn quiescence(&mut self, mut alpha: i32, beta: i32, ply: u32) -> i32 {
        let stand_pat = self.scorer.score(&self.board);
        if stand_pat >= beta || ply >= MAX_PLY {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);

        let mut moves = generate_legal_moves_in_place(&mut self.board);
        moves.retain(|mv| self.is_tactical(mv));
        self.order_moves(&mut moves);

        for mv in moves {
            self.visit();
            if self.aborted {
                return 0;
            }

            let undo = make_move(&mut self.board, mv);
            let score = -self.quiescence(-beta, -alpha, ply + 1);
            unmake_move(&mut self.board, mv, &undo);

            if score >= beta {
                return score;
            }
            alpha = alpha.max(score);
        }

        alpha
    }

    #[inline]
    fn is_tactical(&self, mv: &Move) -> bool {
        mv.is_en_passant() || mv.is_promotion() || self.board.piece_at(mv.to).is_some()
    }

    /// Hash move, then captures and promotions by MVV-LVA, then quiet moves.
    fn order_moves(&self, moves: &mut [Move]) {
        let hash_move = self.table.probe(self.board.hash);
        moves.sort_by_cached_key(|mv| {
            if hash_move == Some(mv.encode()) {
                return -HASH_MOVE_BONUS;
            }
            let attacker = mv.piece.map_or(0, |p| piece_value(p.kind));
            let victim = if mv.is_en_passant() {
                piece_value(PieceKind::Pawn)
            } else {
                self.board.piece_at(mv.to).map_or(0, |p| piece_value(p.kind))
            };
            let promotion = mv.promotion_piece().map_or(0, piece_value);
            if victim > 0 || promotion > 0 {
                -(TACTICAL_BONUS + victim * 10 + promotion - attacker / 10)
            } else {
                0
            }
        });
    }
}
