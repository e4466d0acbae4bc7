//! Fixed-size best-move table keyed by Zobrist hash.
//!
//! Direct-indexed with depth-preferred replacement. Only the best move is
//! kept; it seeds move ordering in the next iteration or the next search.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMoveEntry {
    pub key: u64,
    pub depth: u32,
    pub best_move: u32,
}

#[derive(Debug, Clone)]
pub struct BestMoveTable {
    entries: Vec<Option<BestMoveEntry>>,
}

impl BestMoveTable {
    pub const DEFAULT_ENTRIES: usize = 1 << 16;

    pub fn with_entries(count: usize) -> Self {
        Self {
            entries: vec![None; count.max(1)],
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    #[inline]
    pub fn probe(&self, key: u64) -> Option<u32> {
        self.entries[self.index(key)]
            .filter(|entry| entry.key == key)
            .map(|entry| entry.best_move)
    }

    pub fn store(&mut self, key: u64, depth: u32, best_move: u32) {
        let index = self.index(key);
        let replace = match self.entries[index] {
            None => true,
            Some(existing) => existing.key != key || depth >= existing.depth,
        };
        if replace {
            self.entries[index] = Some(BestMoveEntry {
                key,
                depth,
                best_move,
            });
        }
    }
}

impl Default for BestMoveTable {
    fn default() -> Self {
        Self::with_entries(Self::DEFAULT_ENTRIES)
    }
}
