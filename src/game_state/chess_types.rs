//! Primitive board vocabulary shared by every layer of the engine core.
//!
//! Colours and piece kinds are kept as small `Copy` enums; a coloured
//! [`Piece`] packs into the 4-bit index carried by every encoded move.

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Piece kind (colour is carried separately by [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A coloured piece. Its index is `kind * 2 + colour`, so white pieces are
/// even and black pieces odd, and `12` is reserved for "no piece".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

/// Index written into move words for an empty piece slot.
pub const NO_PIECE_INDEX: u8 = 12;

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.kind.index() * 2 + self.color.index()
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        let color = if index % 2 == 0 { Color::White } else { Color::Black };
        match PieceKind::from_index(index / 2) {
            Some(kind) => Some(Self { kind, color }),
            None => None,
        }
    }

    pub fn to_fen_char(self) -> char {
        let base = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => base.to_ascii_uppercase(),
            Color::Black => base,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };

        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };

        Some(Self { kind, color })
    }
}

/// Board square index (`0..=63`, a1 = 0, h8 = 63).
pub type Square = u8;

pub const SQUARE_COUNT: usize = 64;

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square / 8
}

/// Castling rights bitmask (`0..=15`).
pub type CastlingRights = u8;

pub const CASTLE_WHITE_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_WHITE: CastlingRights = CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE;
pub const CASTLE_BLACK: CastlingRights = CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE;
pub const CASTLE_ALL: CastlingRights = CASTLE_WHITE | CASTLE_BLACK;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_index_interleaves_colours() {
        assert_eq!(Piece::new(PieceKind::Pawn, Color::White).index(), 0);
        assert_eq!(Piece::new(PieceKind::Pawn, Color::Black).index(), 1);
        assert_eq!(Piece::new(PieceKind::King, Color::Black).index(), 11);
        assert_eq!(Piece::from_index(12), None);

        for index in 0..12 {
            let piece = Piece::from_index(index).expect("indices below 12 are pieces");
            assert_eq!(piece.index(), index);
        }
    }

    #[test]
    fn fen_chars_carry_colour_in_case() {
        let white_knight = Piece::from_fen_char('N').expect("N is a piece");
        assert_eq!(white_knight, Piece::new(PieceKind::Knight, Color::White));
        assert_eq!(white_knight.to_fen_char(), 'N');
        assert_eq!(Piece::from_fen_char('q').map(|p| p.color), Some(Color::Black));
        assert_eq!(Piece::from_fen_char('x'), None);
    }
}
