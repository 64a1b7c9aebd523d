//! Transposition table for the minimax search.
//!
//! Entries are keyed by the full board, the remaining search depth and the
//! side to move: the same board searched to a different depth has a
//! different score, so board-only keys would mix them up. Alpha-beta scores
//! are stored together with the kind of bound they represent.

use rustc_hash::FxHashMap;

use crate::game::{Board, Player};

/// What a stored score says about the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is the exact value.
    Exact,
    /// The true value is at least the score (search failed high).
    Lower,
    /// The true value is at most the score (search failed low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub score: i64,
    pub bound: Bound,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    board: Board,
    depth: u32,
    to_move: Player,
}

/// Lookup/store counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub lookups: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: FxHashMap<TableKey, TableEntry>,
    capacity: usize,
    stats: TableStats,
}

impl TranspositionTable {
    pub const DEFAULT_CAPACITY: usize = 1 << 20;

    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: FxHashMap::default(),
            capacity: capacity.max(1),
            stats: TableStats::default(),
        }
    }

    pub fn lookup(&mut self, board: &Board, depth: u32, to_move: Player) -> Option<TableEntry> {
        self.stats.lookups += 1;
        let key = TableKey {
            board: board.clone(),
            depth,
            to_move,
        };
        let entry = self.entries.get(&key).copied();
        if entry.is_some() {
            self.stats.hits += 1;
        }
        entry
    }

    pub fn store(&mut self, board: &Board, depth: u32, to_move: Player, entry: TableEntry) {
        // Simple replacement policy: start over once full.
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.stats.stores += 1;
        self.entries.insert(
            TableKey {
                board: board.clone(),
                depth,
                to_move,
            },
            entry,
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = TableStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
