//! Caching primitives for the mirror tree: TTL slots, debounced recompute,
//! bounded history, and the snapshot store that composes them.

/// Coalescing recompute scheduler.
pub mod debounce;
/// Bounded ring buffer of previous values.
pub mod history;
/// Single-value TTL cache.
pub mod slot;
/// First/latest/history snapshot store.
pub mod store;

pub use debounce::{DebouncedRecompute, Producer, Recompute};
pub use history::HistoryRing;
pub use slot::ExpiringSlot;
pub use store::{SnapshotStore, StorePoll, StorePolicy};
