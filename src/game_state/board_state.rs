//! Raw board data owned by a `Position` and mutated by the engine backend.
//!
//! `BoardState` keeps three redundant views of piece placement (the square
//! array, one mask per coloured piece and the occupancy masks) plus the
//! incremental hashes. `put_piece` and `remove_piece` are the only writers
//! of placement and keep every view and both hashes in step.

use std::collections::VecDeque;

use crate::game_state::bitset::BitSet;
use crate::game_state::chess_rules::HASH_HISTORY_CAPACITY;
use crate::game_state::chess_types::{CastlingRights, Color, Piece, PieceKind, Square};
use crate::search::zobrist::{self, is_pawn_hash_piece, piece_square_key};

pub const OCC_WHITE: usize = 0;
pub const OCC_BLACK: usize = 1;
pub const OCC_BOTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub squares: [Option<Piece>; 64],
    /// Indexed by `Piece::index()`.
    pub pieces: [BitSet; 12],
    /// White, black, both.
    pub occupancy: [BitSet; 3],

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// Empty, or the single square a pawn may capture onto en passant.
    pub en_passant: BitSet,

    pub hash: u64,
    pub pawn_hash: u64,

    pub ply: u16,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    /// Hashes of the positions before each applied move, oldest first.
    pub hash_history: VecDeque<u64>,
}

impl Default for BoardState {
    fn default() -> Self {
        let mut board = Self {
            squares: [None; 64],
            pieces: [BitSet::EMPTY; 12],
            occupancy: [BitSet::EMPTY; 3],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant: BitSet::EMPTY,
            hash: 0,
            pawn_hash: 0,
            ply: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash_history: VecDeque::with_capacity(HASH_HISTORY_CAPACITY),
        };
        board.refresh_hashes();
        board
    }
}

impl BoardState {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[inline]
    pub fn pieces_of(&self, kind: PieceKind, color: Color) -> BitSet {
        self.pieces[Piece::new(kind, color).index()]
    }

    #[inline]
    pub fn occupancy_of(&self, color: Color) -> BitSet {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> BitSet {
        self.occupancy[OCC_BOTH]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceKind::King, color).lowest()
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.lowest()
    }

    /// Places `piece` on an empty square.
    pub fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.squares[square as usize].is_none(), "square {square} occupied");
        self.squares[square as usize] = Some(piece);
        self.pieces[piece.index()].insert(square);
        self.occupancy[piece.color.index()].insert(square);
        self.occupancy[OCC_BOTH].insert(square);
        self.toggle_hashes(piece, square);
    }

    /// Clears a square, returning whatever stood there.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.squares[square as usize].take()?;
        self.pieces[piece.index()].remove(square);
        self.occupancy[piece.color.index()].remove(square);
        self.occupancy[OCC_BOTH].remove(square);
        self.toggle_hashes(piece, square);
        Some(piece)
    }

    #[inline]
    fn toggle_hashes(&mut self, piece: Piece, square: Square) {
        let key = piece_square_key(piece, square);
        self.hash ^= key;
        if is_pawn_hash_piece(piece) {
            self.pawn_hash ^= key;
        }
    }

    /// Recomputes both hashes from scratch; used after bulk edits like FEN loads.
    pub fn refresh_hashes(&mut self) {
        self.hash = zobrist::compute_hash(self);
        self.pawn_hash = zobrist::compute_pawn_hash(self);
    }

    /// Records the current hash before a move. Once the buffer is full the
    /// oldest entry is dropped and returned so an unmake can put it back.
    pub fn remember_hash(&mut self) -> Option<u64> {
        let evicted = if self.hash_history.len() >= HASH_HISTORY_CAPACITY {
            self.hash_history.pop_front()
        } else {
            None
        };
        self.hash_history.push_back(self.hash);
        evicted
    }

    /// Number of earlier positions in the buffer equal to the current one.
    pub fn repetitions(&self) -> usize {
        self.hash_history.iter().filter(|&&h| h == self.hash).count()
    }

    /// Checks the cross-view invariants. Used by tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let white = self.occupancy[OCC_WHITE];
        let black = self.occupancy[OCC_BLACK];
        if (white & black) != BitSet::EMPTY || (white | black) != self.occupancy[OCC_BOTH] {
            return false;
        }

        let mut by_piece = [BitSet::EMPTY; 12];
        for (square, slot) in self.squares.iter().enumerate() {
            if let Some(piece) = slot {
                by_piece[piece.index()].insert(square as Square);
            }
        }
        if by_piece != self.pieces {
            return false;
        }

        let mut by_color = [BitSet::EMPTY; 2];
        for (index, mask) in self.pieces.iter().enumerate() {
            by_color[index % 2] = by_color[index % 2] | *mask;
        }
        by_color[0] == white
            && by_color[1] == black
            && self.hash == zobrist::compute_hash(self)
            && self.pawn_hash == zobrist::compute_pawn_hash(self)
    }
}

#[cfg(test)]
mod tests {
    use super::BoardState;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::search::zobrist::compute_hash;

    #[test]
    fn put_and_remove_keep_views_and_hash_in_step() {
        let mut board = BoardState::empty();
        let empty_hash = board.hash;
        let knight = Piece::new(PieceKind::Knight, Color::Black);

        board.put_piece(42, knight);
        assert!(board.is_consistent());
        assert_eq!(board.piece_at(42), Some(knight));
        assert_eq!(board.hash, compute_hash(&board));
        assert_eq!(board.pawn_hash, 0);

        assert_eq!(board.remove_piece(42), Some(knight));
        assert_eq!(board.remove_piece(42), None);
        assert_eq!(board.hash, empty_hash);
        assert!(board.is_consistent());
    }

    #[test]
    fn hash_history_is_bounded() {
        let mut board = BoardState::empty();
        for _ in 0..super::HASH_HISTORY_CAPACITY {
            assert_eq!(board.remember_hash(), None);
        }
        assert_eq!(board.remember_hash(), Some(board.hash));
        assert_eq!(board.hash_history.len(), super::HASH_HISTORY_CAPACITY);
        assert_eq!(board.repetitions(), super::HASH_HISTORY_CAPACITY);
    }
}
