//! The leaderboard store: one in-memory [`Leaderboard`] behind a reader/writer
//! lock, mirrored to a [`FileStorage`] document.
//!
//! Writers (`initialize`, `submit`, `clear`) hold the lock exclusively for the
//! whole mutate-then-save sequence, so the backing file is only ever written
//! under the write lock and readers see either the state before or after a
//! submission.
//!
//! A save that fails after an admission leaves the admission applied in
//! memory. The caller gets `IOFailure` and should treat the entry as accepted
//! but not durable; the next successful save persists it. Nothing is rolled
//! back.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::StoreResult;
use crate::leaderboard::{Admission, Entry, EvictionScope, Leaderboard, Stats};
use crate::storage::FileStorage;

#[derive(Debug, Default)]
struct State {
    board: Leaderboard,
    initialized: bool,
}

/// Cheap to clone: every clone shares the same collection and lock.
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    state: Arc<RwLock<State>>,
    storage: FileStorage,
    capacity: usize,
    scope: EvictionScope,
}

impl LeaderboardStore {
    pub fn new(storage: FileStorage, capacity: usize, scope: EvictionScope) -> Self {
        LeaderboardStore {
            state: Arc::new(RwLock::new(State::default())),
            storage,
            capacity,
            scope,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        LeaderboardStore::new(
            FileStorage::new(&settings.storage_path),
            settings.capacity,
            settings.eviction_scope,
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Loads the backing file, or creates it empty when missing. Later calls
    /// return immediately.
    pub fn initialize(&self) -> StoreResult<()> {
        if self.state.read().initialized {
            return Ok(());
        }

        let mut state = self.state.write();
        // Another writer may have won the race for the lock.
        if state.initialized {
            return Ok(());
        }

        match self.storage.load()? {
            None => {
                let board = Leaderboard::new();
                self.storage.save(&board)?;
                info!(
                    "Created empty leaderboard at {}",
                    self.storage.path().display()
                );
                state.board = board;
            }
            Some(entries) => {
                let mut board = Leaderboard::from_entries(entries);
                let dropped = board.normalize(self.capacity);
                if dropped > 0 {
                    warn!(
                        "Stored leaderboard exceeds capacity {}, ignoring {dropped} worst-ranked entries",
                        self.capacity
                    );
                }
                info!(
                    "Loaded {} leaderboard entries from {}",
                    board.len(),
                    self.storage.path().display()
                );
                state.board = board;
            }
        }

        state.initialized = true;
        Ok(())
    }

    /// Offers a new score. `Ok(Admission::Rejected)` means it was not good
    /// enough; no I/O happens in that case.
    pub fn submit(
        &self,
        player: &str,
        category: i64,
        points: i64,
        duration: f64,
    ) -> StoreResult<Admission> {
        let entry = Entry::submitted(player, category, points, duration)?;
        self.initialize()?;

        let mut state = self.state.write();
        let admission = state.board.admit(entry, self.capacity, self.scope);
        match &admission {
            Admission::Rejected => {
                debug!("Rejected {player} on level {category} with time {duration}");
            }
            Admission::Appended => {
                debug!("Admitted {player} on level {category} with time {duration}");
                self.storage.save(&state.board)?;
            }
            Admission::Replaced(evicted) => {
                debug!(
                    "Admitted {player} on level {category} with time {duration}, evicting {} ({})",
                    evicted.player, evicted.duration
                );
                self.storage.save(&state.board)?;
            }
        }
        Ok(admission)
    }

    /// Empties the leaderboard. The empty document is written first and the
    /// in-memory collection is only reset once that succeeded, both under the
    /// write lock.
    ///
    /// Does not need a prior `initialize`, so it can also replace a backing
    /// file that failed to parse.
    pub fn clear(&self) -> StoreResult<()> {
        let mut state = self.state.write();
        self.storage.save(&[])?;
        state.board.clear();
        state.initialized = true;
        info!("Cleared leaderboard at {}", self.storage.path().display());
        Ok(())
    }

    /// First `n` entries in leaderboard order (level, then time).
    pub fn top_n(&self, n: usize) -> StoreResult<Vec<Entry>> {
        self.initialize()?;
        Ok(self.state.read().board.top_n(n))
    }

    pub fn top_n_by_category(&self, category: i64, n: usize) -> StoreResult<Vec<Entry>> {
        self.initialize()?;
        Ok(self.state.read().board.top_n_by_category(category, n))
    }

    pub fn top_n_by_duration(&self, n: usize) -> StoreResult<Vec<Entry>> {
        self.initialize()?;
        Ok(self.state.read().board.top_n_by_duration(n))
    }

    pub fn entries(&self) -> StoreResult<Vec<Entry>> {
        self.top_n(self.capacity)
    }

    /// Aggregates over the in-memory collection, which is empty until the
    /// store is initialized.
    pub fn stats(&self) -> Stats {
        self.state.read().board.stats()
    }
}
