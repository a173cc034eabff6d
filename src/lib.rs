pub mod cli;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod server;
pub mod storage;
pub mod store;

pub use error::{StorageError, StoreResult};
pub use leaderboard::{Admission, Entry, EvictionScope, Stats};
pub use store::LeaderboardStore;
