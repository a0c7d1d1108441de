use crate::puzzle::PuzzleState;
use log::debug;
use std::collections::HashMap;

/// Size past which the set is shrunk.
pub const DEFAULT_CAPACITY: usize = 3000;
/// How many of the costliest states one eviction drops.
pub const DEFAULT_EVICTION: usize = 500;

/// States already expanded, each remembered with the total cost it was expanded at.
pub struct VisitedSet {
    entries: HashMap<PuzzleState, (u32, u64)>,
    next_seq: u64,
    capacity: usize,
    eviction: usize,
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, DEFAULT_EVICTION)
    }
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(capacity: usize, eviction: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
            capacity,
            eviction,
        }
    }

    pub fn contains(&self, state: &PuzzleState) -> bool {
        self.entries.contains_key(state)
    }

    /// Records `state`, returning false if it was already present.
    pub fn insert(&mut self, state: PuzzleState, f: u32) -> bool {
        if self.entries.contains_key(&state) {
            return false;
        }
        self.entries.insert(state, (f, self.next_seq));
        self.next_seq += 1;
        true
    }

    /// Once the set holds more than its capacity, drops the highest-cost entries.
    /// Returns how many were evicted.
    pub fn evict_if_oversized(&mut self) -> usize {
        if self.entries.len() <= self.capacity {
            return 0;
        }

        let mut ranked: Vec<(PuzzleState, (u32, u64))> = self.entries.drain().collect();
        ranked.sort_unstable_by_key(|&(_, key)| key);
        let keep = ranked.len().saturating_sub(self.eviction);
        let evicted = ranked.len() - keep;
        ranked.truncate(keep);
        self.entries.extend(ranked);

        debug!(
            "Visited set exceeded {} states, evicted {} highest-cost entries",
            self.capacity, evicted
        );
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }
}
