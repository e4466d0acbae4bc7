//! Packed 32-bit move words.
//!
//! Layout: `from | to << 6 | piece_index << 12 | flag << 16`, with field
//! widths 6, 6, 4 and 4 bits. The piece index is `kind * 2 + colour` and 12
//! stands for "no piece" (only used by the null move).
//!
//! Move identity is `(from, to, piece)`. Flags only carry special-move
//! semantics, so two moves differing only in flag compare equal and hash
//! alike.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Piece, PieceKind, Square, NO_PIECE_INDEX};
use crate::utils::algebraic::square_to_algebraic;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const FLAG_SHIFT: u32 = 16;

const SQUARE_MASK: u32 = 0x3F;
const NIBBLE_MASK: u32 = 0xF;

const PROMOTION_BIT: u8 = 8;

/// Special-move tag stored in the top nibble of a move word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    Normal = 0,
    Castle = 1,
    EnPassant = 6,
    PromoteKnight = 8,
    PromoteBishop = 9,
    PromoteRook = 10,
    PromoteQueen = 11,
}

impl MoveFlag {
    pub const PROMOTIONS: [MoveFlag; 4] = [
        MoveFlag::PromoteKnight,
        MoveFlag::PromoteBishop,
        MoveFlag::PromoteRook,
        MoveFlag::PromoteQueen,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MoveFlag::Normal),
            1 => Some(MoveFlag::Castle),
            6 => Some(MoveFlag::EnPassant),
            8 => Some(MoveFlag::PromoteKnight),
            9 => Some(MoveFlag::PromoteBishop),
            10 => Some(MoveFlag::PromoteRook),
            11 => Some(MoveFlag::PromoteQueen),
            _ => None,
        }
    }

    /// Promotion flag for a target kind; `None` for pawn and king.
    #[inline]
    pub const fn promotion_to(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Knight => Some(MoveFlag::PromoteKnight),
            PieceKind::Bishop => Some(MoveFlag::PromoteBishop),
            PieceKind::Rook => Some(MoveFlag::PromoteRook),
            PieceKind::Queen => Some(MoveFlag::PromoteQueen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Option<Piece>,
    pub flag: MoveFlag,
}

impl Move {
    /// Sentinel "no move": `(a1, a1, none, normal)`. Never playable.
    pub const NULL: Move = Move {
        from: 0,
        to: 0,
        piece: None,
        flag: MoveFlag::Normal,
    };

    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece, flag: MoveFlag) -> Self {
        Self {
            from,
            to,
            piece: Some(piece),
            flag,
        }
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Self::new(from, to, piece, MoveFlag::Normal)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.piece.is_none() && self.from == 0 && self.to == 0
    }

    #[inline]
    pub const fn encode(&self) -> u32 {
        let piece_index = match self.piece {
            Some(piece) => piece.index() as u32,
            None => NO_PIECE_INDEX as u32,
        };
        ((self.from as u32 & SQUARE_MASK) << FROM_SHIFT)
            | ((self.to as u32 & SQUARE_MASK) << TO_SHIFT)
            | (piece_index << PIECE_SHIFT)
            | ((self.flag.code() as u32) << FLAG_SHIFT)
    }

    /// Decodes a move word, reporting corrupt piece or flag nibbles.
    pub fn try_decode(word: u32) -> ChessResult<Move> {
        if word >> (FLAG_SHIFT + 4) != 0 {
            return Err(ChessError::CorruptMoveWord(word));
        }

        let from = ((word >> FROM_SHIFT) & SQUARE_MASK) as Square;
        let to = ((word >> TO_SHIFT) & SQUARE_MASK) as Square;
        let piece_index = ((word >> PIECE_SHIFT) & NIBBLE_MASK) as u8;
        let flag_code = ((word >> FLAG_SHIFT) & NIBBLE_MASK) as u8;

        let piece = match piece_index {
            NO_PIECE_INDEX => None,
            index => Some(
                Piece::from_index(index as usize).ok_or(ChessError::CorruptMoveWord(word))?,
            ),
        };
        let flag = MoveFlag::from_code(flag_code).ok_or(ChessError::CorruptMoveWord(word))?;

        Ok(Move {
            from,
            to,
            piece,
            flag,
        })
    }

    /// Decodes a word produced by [`Move::encode`].
    ///
    /// # Panics
    ///
    /// Panics on a corrupt word. Backends only hand out words they encoded,
    /// so a corrupt word is a bug rather than an input error.
    pub fn decode(word: u32) -> Move {
        match Self::try_decode(word) {
            Ok(mv) => mv,
            Err(err) => panic!("{err}"),
        }
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.flag.code() & PROMOTION_BIT != 0
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.flag == MoveFlag::EnPassant
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.flag == MoveFlag::Castle
    }

    /// Kind the pawn turns into, from the low two flag bits offset by knight.
    #[inline]
    pub const fn promotion_piece(&self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        PieceKind::from_index((self.flag.code() & 0x3) as usize + PieceKind::Knight.index())
    }

    /// Coordinate notation (`e2e4`, `e7e8q`); `0000` for the null move.
    pub fn to_uci(&self) -> String {
        if self.is_null() {
            return "0000".to_owned();
        }

        let mut out = square_to_algebraic(self.from);
        out.push_str(&square_to_algebraic(self.to));
        if let Some(kind) = self.promotion_piece() {
            out.push(promotion_char(kind));
        }
        out
    }
}

fn promotion_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        _ => 'q',
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.piece == other.piece
    }
}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.piece.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
