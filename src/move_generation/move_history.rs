//! Make/unmake stack owned by a `Position`.
//!
//! `Position::push` applies a legal move and records how to undo it here;
//! `Position::pop` reverses the most recent push exactly, hash included.
//! The stack is emptied whenever its position is replaced, so an entry is
//! never replayed onto a board it did not come from.

use crate::game_state::undo_state::UndoRecord;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    entries: Vec<(Move, UndoRecord)>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, mv: Move, undo: UndoRecord) {
        self.entries.push((mv, undo));
    }

    pub(crate) fn take_last(&mut self) -> Option<(Move, UndoRecord)> {
        self.entries.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn peek(&self) -> Option<Move> {
        self.entries.last().map(|(mv, _)| *mv)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Played moves, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().map(|(mv, _)| *mv)
    }
}
