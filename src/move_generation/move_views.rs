//! Pseudo-legal and legal move views over one `Position`.
//!
//! A `MoveGenerator` is one generation request: each view is fetched from
//! the backend the first time it is used and reused afterwards. Ask the
//! position for a new generator to see the board as it is now.

use std::cell::OnceCell;

use crate::game_state::chess_types::Color;
use crate::game_state::position::Position;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveView {
    /// Obeys piece movement; may leave the mover's king attacked.
    PseudoLegal,
    Legal,
}

#[derive(Debug)]
pub struct MoveGenerator<'a> {
    position: &'a Position,
    pseudo_legal: OnceCell<Vec<Move>>,
    legal: OnceCell<Vec<Move>>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(position: &'a Position) -> Self {
        Self {
            position,
            pseudo_legal: OnceCell::new(),
            legal: OnceCell::new(),
        }
    }

    pub fn view(&self, view: MoveView) -> &[Move] {
        let backend = self.position.backend();
        let board = self.position.board();
        match view {
            MoveView::PseudoLegal => self
                .pseudo_legal
                .get_or_init(|| backend.generate_pseudo_legal(board)),
            MoveView::Legal => self.legal.get_or_init(|| backend.generate_legal(board)),
        }
    }

    #[inline]
    pub fn legal(&self) -> &[Move] {
        self.view(MoveView::Legal)
    }

    #[inline]
    pub fn pseudo_legal(&self) -> &[Move] {
        self.view(MoveView::PseudoLegal)
    }

    /// The generated legal move matching `requested`.
    ///
    /// Moves compare by source, destination and piece. When that matches
    /// several promotions the requested flag picks one; a request without a
    /// promotion flag takes the generated flag (castle, en passant) but
    /// never matches a promotion.
    pub fn find(&self, requested: &Move) -> Option<Move> {
        let mut candidates = self.legal().iter().filter(|mv| *mv == requested);
        if requested.is_promotion() {
            candidates.find(|mv| mv.flag == requested.flag).copied()
        } else {
            candidates.find(|mv| !mv.is_promotion()).copied()
        }
    }

    /// Legal-view membership, with the promotion choice taken into account.
    pub fn contains(&self, mv: &Move) -> bool {
        self.find(mv).is_some()
    }

    /// Number of legal moves.
    pub fn len(&self) -> usize {
        self.legal().len()
    }

    pub fn is_empty(&self) -> bool {
        self.legal().is_empty()
    }

    pub fn castling_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.legal().iter().copied().filter(Move::is_castle)
    }

    pub fn en_passant_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.legal().iter().copied().filter(Move::is_en_passant)
    }

    /// Legal moves that capture a piece of `color`.
    pub fn captures_against(&self, color: Color) -> impl Iterator<Item = Move> + '_ {
        let targets = self.position.occupancy(color);
        let mover = self.position.side_to_move();
        self.legal().iter().copied().filter(move |mv| {
            targets.contains(mv.to) || (mv.is_en_passant() && mover.opposite() == color)
        })
    }
}
