pub mod entry;
pub mod ranking;

use itertools::Itertools;
use std::ops::Deref;

pub use entry::{Entry, Stats};
pub use ranking::EvictionScope;

/// Outcome of offering an entry to the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// There was room left, nothing was dropped.
    Appended,
    /// The leaderboard was full and the returned entry made room.
    Replaced(Entry),
    /// Not fast enough. The leaderboard is unchanged.
    Rejected,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Rejected)
    }
}

// Bounded, ordered set of retained entries. Only `admit`, `normalize` and
// `clear` mutate it, and each of them leaves it sorted by `ranking::compare`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard(Vec<Entry>);

impl Deref for Leaderboard {
    type Target = Vec<Entry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Leaderboard {
    pub fn new() -> Leaderboard {
        Leaderboard(Vec::new())
    }

    /// Wraps entries read from storage. Call `normalize` before use.
    pub fn from_entries(entries: Vec<Entry>) -> Leaderboard {
        Leaderboard(entries)
    }

    /// Sorts and drops the worst-ranked surplus beyond `capacity`.
    /// Returns the number of dropped entries.
    pub fn normalize(&mut self, capacity: usize) -> usize {
        self.0.sort_by(ranking::compare);
        let surplus = self.0.len().saturating_sub(capacity);
        self.0.truncate(capacity);
        surplus
    }

    pub fn admit(&mut self, entry: Entry, capacity: usize, scope: EvictionScope) -> Admission {
        if self.0.len() < capacity {
            self.0.push(entry);
            self.normalize(capacity);
            return Admission::Appended;
        }

        let victim = ranking::eviction_candidate(&self.0, &entry, scope)
            .filter(|&idx| entry.duration < self.0[idx].duration);

        match victim {
            Some(idx) => {
                let evicted = std::mem::replace(&mut self.0[idx], entry);
                self.normalize(capacity);
                Admission::Replaced(evicted)
            }
            None => Admission::Rejected,
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn top_n(&self, n: usize) -> Vec<Entry> {
        self.iter().take(n).cloned().collect()
    }

    pub fn top_n_by_category(&self, category: i64, n: usize) -> Vec<Entry> {
        self.iter()
            .filter(|e| e.category == category)
            .sorted_by(|a, b| ranking::compare_duration(a, b))
            .take(n)
            .cloned()
            .collect()
    }

    /// Ranking across every level at once, fastest first.
    pub fn top_n_by_duration(&self, n: usize) -> Vec<Entry> {
        self.iter()
            .sorted_by(|a, b| ranking::compare_duration(a, b))
            .take(n)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_entries: self.len(),
            unique_players: self.iter().map(|e| e.player.as_str()).unique().count(),
        }
    }
}
