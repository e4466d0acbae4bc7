//! Board state paired with the engine backend that interprets it.
//!
//! `Position` owns a `BoardState` and answers read-only queries about it.
//! Anything that needs attack computation is forwarded to the injected
//! `EngineBackend`; the position never works out attacks itself. Mutation
//! happens through `set_fen`, `reset`, `clear` and the `push`/`pop` pair,
//! which keeps its own `MoveHistory`. Replacing the board empties that
//! history.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_backend::EngineBackend;
use crate::game_state::bitset::BitSet;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, STARTING_POSITION_FEN};
use crate::game_state::chess_types::*;
use crate::move_generation::move_history::MoveHistory;
use crate::move_generation::move_views::MoveGenerator;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone)]
pub struct Position {
    board: BoardState,
    backend: Arc<dyn EngineBackend>,
    history: MoveHistory,
}

impl Position {
    /// An empty board. Call `reset` or `set_fen` before playing.
    pub fn new(backend: Arc<dyn EngineBackend>) -> Self {
        backend.init();
        Self {
            board: BoardState::empty(),
            backend,
            history: MoveHistory::new(),
        }
    }

    pub fn starting(backend: Arc<dyn EngineBackend>) -> ChessResult<Self> {
        let mut position = Self::new(backend);
        position.reset()?;
        Ok(position)
    }

    /// Replaces the whole board and empties the move history. On error the
    /// previous board and history are kept.
    pub fn set_fen(&mut self, fen: &str) -> ChessResult<()> {
        match self.backend.load_fen(fen) {
            Ok(board) => {
                self.board = board;
                self.history.clear();
                debug!(fen, "position loaded");
                Ok(())
            }
            Err(err) => {
                warn!(fen, %err, "rejected FEN");
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) -> ChessResult<()> {
        self.set_fen(STARTING_POSITION_FEN)
    }

    pub fn clear(&mut self) {
        self.board = BoardState::empty();
        self.history.clear();
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[inline]
    pub fn backend(&self) -> &Arc<dyn EngineBackend> {
        &self.backend
    }

    /// Moves pushed since the board was last replaced.
    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// A fresh generation request over the current board.
    pub fn moves(&self) -> MoveGenerator<'_> {
        MoveGenerator::new(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color)
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> BitSet {
        self.board.occupancy_of(color)
    }

    #[inline]
    pub fn occupied(&self) -> BitSet {
        self.board.occupied()
    }

    /// Pieces of `color` attacking `square` on the current board.
    pub fn attackers(&self, color: Color, square: Square) -> BitSet {
        self.attacks_mask(square) & self.occupancy(color)
    }

    /// Pieces of either colour attacking `square` on the current board.
    pub fn attacks_mask(&self, square: Square) -> BitSet {
        self.backend
            .attacks_to_square(&self.board, square, self.board.occupied())
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king_square(color)
    }

    pub fn is_check(&self) -> bool {
        self.backend.is_check(&self.board)
    }

    /// Enemy pieces giving check to the side to move.
    pub fn checkers(&self) -> BitSet {
        let side = self.side_to_move();
        self.king_square(side)
            .map_or(BitSet::EMPTY, |king| self.attackers(side.opposite(), king))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.board.castling_rights
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.board.en_passant_square()
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.board.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.board.hash
    }

    #[inline]
    pub fn pawn_key(&self) -> u64 {
        self.board.pawn_hash
    }

    pub fn to_fen(&self) -> String {
        self.backend.to_fen(&self.board)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.moves().is_empty()
    }

    pub fn is_fifty_moves(&self) -> bool {
        self.board.halfmove_clock >= FIFTY_MOVE_HALFMOVES
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.board.repetitions() + 1 >= 3
    }

    /// Bare kings, a single minor piece, or bishops that all share one
    /// square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
        if Color::ALL
            .iter()
            .any(|&color| heavy.iter().any(|&kind| !self.board.pieces_of(kind, color).is_empty()))
        {
            return false;
        }

        let knights = Color::ALL
            .iter()
            .map(|&color| self.board.pieces_of(PieceKind::Knight, color).len())
            .sum::<usize>();
        let bishops = Color::ALL
            .iter()
            .fold(BitSet::EMPTY, |acc, &color| {
                acc | self.board.pieces_of(PieceKind::Bishop, color)
            });

        match (knights, bishops.len()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (0, _) => {
                let shade = |square: Square| (file_of(square) + rank_of(square)) % 2;
                let mut shades = bishops.iter().map(shade);
                let first = shades.next();
                shades.all(|s| Some(s) == first)
            }
            _ => false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate()
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_fifty_moves()
            || self.is_threefold_repetition()
    }

    /// Leaf count of the legal move tree. The board is left unchanged.
    pub fn perft(&self, depth: i64) -> ChessResult<u64> {
        if depth <= 0 {
            return Err(ChessError::InvalidDepth(depth));
        }
        let depth = u32::try_from(depth).map_err(|_| ChessError::InvalidDepth(depth))?;
        Ok(self.backend.perft(&self.board, depth))
    }

    /// Leaf count below each legal root move, in generation order.
    pub fn perft_divide(&self, depth: i64) -> ChessResult<Vec<(Move, u64)>> {
        if depth <= 0 {
            return Err(ChessError::InvalidDepth(depth));
        }
        let depth = u32::try_from(depth).map_err(|_| ChessError::InvalidDepth(depth))?;
        Ok(self.backend.perft_divide(&self.board, depth))
    }

    /// Plays `mv` if it is in the legal view.
    ///
    /// Returns the move actually played, carrying the generated flag.
    pub fn push(&mut self, mv: Move) -> ChessResult<Move> {
        let Some(canonical) = self.moves().find(&mv) else {
            warn!(mv = %mv, fen = %self.to_fen(), "rejected illegal move");
            return Err(ChessError::IllegalMove(mv.to_uci()));
        };

        let undo = self.backend.make(&mut self.board, canonical);
        self.history.record(canonical, undo);
        debug!(mv = %canonical, depth = self.history.len(), "move pushed");
        Ok(canonical)
    }

    /// Takes back the most recent push.
    pub fn pop(&mut self) -> ChessResult<Move> {
        let (mv, undo) = self.history.take_last().ok_or(ChessError::EmptyHistory)?;
        self.backend.unmake(&mut self.board, mv, &undo);
        Ok(mv)
    }

    pub fn peek(&self) -> Option<Move> {
        self.history.peek()
    }

    /// Forgets every pushed move. The board is left as it is.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Position;
    use crate::chess_errors::ChessError;
    use crate::engines::native_backend::NativeBackend;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind, CASTLE_ALL};
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::long_algebraic::parse_uci_move;

    fn position(fen: &str) -> Position {
        let mut position = Position::new(Arc::new(NativeBackend::new()));
        position.set_fen(fen).expect("FEN should parse");
        position
    }

    fn sq(name: &str) -> u8 {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn new_position_is_empty_until_reset() {
        let mut position = Position::new(Arc::new(NativeBackend::new()));
        assert!(position.occupied().is_empty());
        assert_eq!(position.king_square(Color::White), None);

        position.reset().expect("start position loads");
        assert_eq!(position.to_fen(), STARTING_POSITION_FEN);
        assert_eq!(position.castling_rights(), CASTLE_ALL);
        assert_eq!(position.occupied().len(), 32);
        assert_eq!(position.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(position.color_at(sq("d1")), Some(Color::White));
        assert_eq!(
            position.piece_at(sq("g8")).map(|p| p.kind),
            Some(PieceKind::Knight)
        );

        position.clear();
        assert!(position.occupied().is_empty());
    }

    #[test]
    fn failed_fen_load_keeps_previous_board() {
        let mut position = position(STARTING_POSITION_FEN);
        let key = position.zobrist_key();

        for bad in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        ] {
            assert!(matches!(position.set_fen(bad), Err(ChessError::InvalidFen(_))));
            assert_eq!(position.to_fen(), STARTING_POSITION_FEN);
            assert_eq!(position.zobrist_key(), key);
        }
    }

    #[test]
    fn attackers_are_split_by_colour() {
        let position = position("4k3/8/8/3r4/8/2N5/8/4K3 w - - 0 1");
        let d5 = sq("d5");
        assert_eq!(position.attackers(Color::White, d5).iter().collect::<Vec<_>>(), vec![sq("c3")]);
        assert!(position.attackers(Color::Black, d5).is_empty());
        assert!(position.attacks_mask(sq("d1")).contains(d5));
        assert!(position.attacks_mask(sq("d1")).contains(sq("e1")));
    }

    #[test]
    fn checkmate_and_stalemate_are_told_apart() {
        let mate = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(mate.is_check());
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());
        assert!(mate.is_game_over());
        assert_eq!(mate.checkers().iter().collect::<Vec<_>>(), vec![sq("h4")]);

        let stalemate = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!stalemate.is_check());
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
        assert!(stalemate.checkers().is_empty());

        let start = position(STARTING_POSITION_FEN);
        assert!(!start.is_game_over());
    }

    #[test]
    fn insufficient_material_cases() {
        assert!(position("4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_insufficient_material());
        assert!(position("4k3/8/8/8/8/8/8/4KN2 w - - 0 1").is_insufficient_material());
        assert!(position("2b1k3/8/8/8/8/8/8/4KB2 w - - 0 1").is_insufficient_material());
        assert!(!position("1b2k3/8/8/8/8/8/8/4KB2 w - - 0 1").is_insufficient_material());
        assert!(!position("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1").is_insufficient_material());
        assert!(!position("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").is_insufficient_material());
    }

    #[test]
    fn fifty_move_counter() {
        assert!(position("4k3/8/8/8/8/8/8/4KR2 w - - 100 80").is_fifty_moves());
        assert!(!position("4k3/8/8/8/8/8/8/4KR2 w - - 99 80").is_fifty_moves());
    }

    #[test]
    fn knight_shuffle_repeats_three_times() {
        let mut position = position(STARTING_POSITION_FEN);
        let start_key = position.zobrist_key();
        for round in 0..2 {
            assert!(!position.is_threefold_repetition(), "round {round}");
            for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                let mv = parse_uci_move(text, position.board()).expect("valid move");
                position.push(mv).expect("legal move");
            }
            assert_eq!(position.zobrist_key(), start_key);
        }
        assert!(position.is_threefold_repetition());
        assert!(position.is_game_over());
    }

    #[test]
    fn perft_rejects_non_positive_depth() {
        let position = position(STARTING_POSITION_FEN);
        assert_eq!(position.perft(0), Err(ChessError::InvalidDepth(0)));
        assert_eq!(position.perft(-3), Err(ChessError::InvalidDepth(-3)));
        assert_eq!(position.perft(2), Ok(400));
    }

    #[test]
    fn perft_divide_splits_the_count_by_root_move() {
        let position = position(STARTING_POSITION_FEN);
        let divided = position.perft_divide(2).expect("positive depth");
        assert_eq!(divided.len(), 20);
        assert!(divided.iter().all(|&(_, count)| count == 20));
        assert_eq!(divided.iter().map(|&(_, count)| count).sum::<u64>(), 400);
        assert_eq!(position.perft_divide(0), Err(ChessError::InvalidDepth(0)));
    }

    #[test]
    fn side_and_counters_follow_the_fen() {
        let position = position("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 42");
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.en_passant(), Some(sq("d6")));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 42);
        assert_ne!(position.pawn_key(), 0);
    }
}
