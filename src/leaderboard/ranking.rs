use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

use super::entry::Entry;

/// Which entries a candidate competes against once the leaderboard is full.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EvictionScope {
    /// The slowest entry of the whole leaderboard is the one at risk.
    #[default]
    Global,
    /// The slowest entry of the candidate's own level is the one at risk. A
    /// level with no entries yet competes against the global slowest.
    Category,
}

/// The leaderboard order: level ascending, then time ascending.
///
/// Every sort of the collection goes through this function, on both the
/// write and the read paths.
pub fn compare(a: &Entry, b: &Entry) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| compare_duration(a, b))
}

/// Time-only order, used once the level is fixed or ignored.
pub fn compare_duration(a: &Entry, b: &Entry) -> Ordering {
    a.duration.total_cmp(&b.duration)
}

/// Index of the entry a candidate would have to beat, if any.
///
/// On equal times the last one in stored order is picked.
pub fn eviction_candidate(entries: &[Entry], candidate: &Entry, scope: EvictionScope) -> Option<usize> {
    let slowest = |in_scope: &dyn Fn(&Entry) -> bool| {
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| in_scope(*e))
            .max_by(|(_, a), (_, b)| compare_duration(a, b))
            .map(|(idx, _)| idx)
    };

    match scope {
        EvictionScope::Global => slowest(&|_: &Entry| true),
        EvictionScope::Category => slowest(&|e: &Entry| e.category == candidate.category)
            .or_else(|| slowest(&|_: &Entry| true)),
    }
}
