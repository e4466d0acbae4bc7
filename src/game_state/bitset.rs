//! 64-square occupancy mask.
//!
//! Bit 0 is a1 and bit 63 is h8. The mask is the only state, so every set
//! operation is a pure function of the operands and equality is mask
//! equality.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Square;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BitSet(pub u64);

impl BitSet {
    pub const EMPTY: BitSet = BitSet(0);
    pub const FULL: BitSet = BitSet(u64::MAX);

    #[inline]
    pub const fn new(mask: u64) -> Self {
        BitSet(mask)
    }

    #[inline]
    pub const fn from_square(square: Square) -> Self {
        BitSet(1u64 << square)
    }

    #[inline]
    pub const fn mask(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn union(self, other: BitSet) -> BitSet {
        BitSet(self.0 | other.0)
    }

    #[inline]
    pub const fn intersect(self, other: BitSet) -> BitSet {
        BitSet(self.0 & other.0)
    }

    #[inline]
    pub const fn symmetric_difference(self, other: BitSet) -> BitSet {
        BitSet(self.0 ^ other.0)
    }

    #[inline]
    pub const fn contains(self, square: Square) -> bool {
        (self.0 >> square) & 1 != 0
    }

    #[inline]
    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square;
    }

    #[inline]
    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1u64 << square);
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Least significant set square, if any.
    #[inline]
    pub const fn lowest(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as Square)
        }
    }

    /// Most significant set square, if any.
    #[inline]
    pub const fn highest(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(63 - self.0.leading_zeros() as Square)
        }
    }

    /// Clears and returns the lowest set square.
    #[inline]
    pub fn pop_lowest(&mut self) -> ChessResult<Square> {
        let square = self.lowest().ok_or(ChessError::EmptySet)?;
        self.0 &= self.0 - 1;
        Ok(square)
    }

    /// Consumes a copy of the mask, yielding squares in ascending order.
    #[inline]
    pub const fn iter(self) -> BitSetIter {
        BitSetIter { remaining: self.0 }
    }
}

/// Ascending square iterator. Once drained it stays empty.
#[derive(Debug, Clone)]
pub struct BitSetIter {
    remaining: u64,
}

impl Iterator for BitSetIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.remaining == 0 {
            return None;
        }
        let square = self.remaining.trailing_zeros() as Square;
        self.remaining &= self.remaining - 1;
        Some(square)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitSetIter {}

impl IntoIterator for BitSet {
    type Item = Square;
    type IntoIter = BitSetIter;

    fn into_iter(self) -> BitSetIter {
        self.iter()
    }
}

impl FromIterator<Square> for BitSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = BitSet::EMPTY;
        for square in iter {
            set.insert(square);
        }
        set
    }
}

impl BitOr for BitSet {
    type Output = BitSet;

    #[inline]
    fn bitor(self, rhs: BitSet) -> BitSet {
        self.union(rhs)
    }
}

impl BitAnd for BitSet {
    type Output = BitSet;

    #[inline]
    fn bitand(self, rhs: BitSet) -> BitSet {
        self.intersect(rhs)
    }
}

impl BitXor for BitSet {
    type Output = BitSet;

    #[inline]
    fn bitxor(self, rhs: BitSet) -> BitSet {
        self.symmetric_difference(rhs)
    }
}

impl Not for BitSet {
    type Output = BitSet;

    #[inline]
    fn not(self) -> BitSet {
        BitSet(!self.0)
    }
}

impl fmt::Display for BitSet {
    /// Renders the mask as an 8x8 grid, rank 8 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let mark = if self.contains(rank * 8 + file) { 'X' } else { '.' };
                write!(f, "{mark}")?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
