//! Fixed-size transposition table.
//!
//! Entries are indexed by `key % capacity` and overwritten unconditionally on
//! store. A probe only returns an entry when the full 64-bit key matches and
//! the stored depth covers the requested depth, so a collision can at worst
//! cost a miss, never a wrong score.

pub const DEFAULT_TT_ENTRIES: usize = 100_000;

/// How the stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Score is a lower bound (the node failed high).
    Lower,
    /// Score is an upper bound (the node failed low).
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TtStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    pub stats: TtStats,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::new_with_entries(DEFAULT_TT_ENTRIES)
    }

    pub fn new_with_entries(capacity: usize) -> Self {
        TranspositionTable {
            entries: vec![None; capacity.max(1)],
            stats: TtStats::default(),
        }
    }

    /// Look up `key`. Returns the entry only on a full key match with stored
    /// depth at least `depth`.
    pub fn probe(&mut self, key: u64, depth: u8) -> Option<TtEntry> {
        self.stats.probes += 1;
        let index = (key % self.entries.len() as u64) as usize;
        match self.entries[index] {
            Some(entry) if entry.key == key && entry.depth >= depth => {
                self.stats.hits += 1;
                Some(entry)
            }
            _ => None,
        }
    }

    /// Store an entry, overwriting whatever occupied the slot.
    pub fn store(&mut self, entry: TtEntry) {
        self.stats.stores += 1;
        let index = (entry.key % self.entries.len() as u64) as usize;
        self.entries[index] = Some(entry);
    }

    pub fn clear(&mut self) {
        for slot in &mut self.entries {
            *slot = None;
        }
        self.stats = TtStats::default();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}
