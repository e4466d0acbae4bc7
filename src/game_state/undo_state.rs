use crate::game_state::bitset::BitSet;
use crate::game_state::chess_types::{CastlingRights, Piece};

/// Everything `unmake` needs to reverse one applied move exactly.
///
/// `moved` is the piece that left the source square (a pawn for
/// promotions). It is `None` when `make` found nothing to move, in which
/// case the board was not touched and `unmake` does nothing either.
/// `evicted_hash` is the repetition entry pushed out of a full hash
/// history by this move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub moved: Option<Piece>,
    pub captured: Option<Piece>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant: BitSet,
    pub prev_halfmove_clock: u16,

    pub prev_hash: u64,
    pub prev_pawn_hash: u64,
    pub evicted_hash: Option<u64>,
}
