//! Snapshot store: first, latest, and recent history of a derived value.
//!
//! A [`SnapshotStore`] pairs an [`ExpiringSlot`] with a
//! [`DebouncedRecompute`]. Reads always see the last committed value;
//! staleness only decides whether the owner should schedule a recompute.
//! Every commit pushes the displaced value into a bounded [`HistoryRing`].

use std::time::{Duration, Instant};

use crate::debounce::{DebouncedRecompute, Producer, Recompute};
use crate::history::HistoryRing;
use crate::slot::ExpiringSlot;

/// Timing and retention parameters for a [`SnapshotStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
	/// How long a committed value counts as fresh.
	pub ttl: Duration,
	/// Quiet period before a scheduled recompute fires.
	pub debounce: Duration,
	/// Maximum number of previous values retained.
	pub history_capacity: usize,
}

impl Default for StorePolicy {
	fn default() -> Self {
		Self {
			ttl: Duration::from_millis(100),
			debounce: Duration::from_millis(30),
			history_capacity: 8,
		}
	}
}

/// Outcome of [`SnapshotStore::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePoll {
	/// No recompute was scheduled.
	Idle,
	/// A recompute is scheduled but not yet due.
	Waiting,
	/// A recompute fired and its value was committed.
	Committed,
	/// A recompute fired but produced nothing; the previous value stays.
	Dropped,
}

pub struct SnapshotStore<T> {
	first: T,
	latest: ExpiringSlot<T>,
	history: HistoryRing<T>,
	recompute: DebouncedRecompute<T>,
	ttl: Duration,
	commits: u64,
}

impl<T: std::fmt::Debug> std::fmt::Debug for SnapshotStore<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SnapshotStore")
			.field("latest", self.latest.value())
			.field("history", &self.history.len())
			.field("pending", &self.recompute.is_pending())
			.field("commits", &self.commits)
			.finish()
	}
}

impl<T: Clone> SnapshotStore<T> {
	/// Creates a store whose first and latest snapshots are both `initial`.
	pub fn new(initial: T, policy: StorePolicy, now: Instant) -> Self {
		Self {
			first: initial.clone(),
			latest: ExpiringSlot::new(initial, policy.ttl, now),
			history: HistoryRing::new(policy.history_capacity),
			recompute: DebouncedRecompute::new(policy.debounce),
			ttl: policy.ttl,
			commits: 0,
		}
	}
}

impl<T> SnapshotStore<T> {
	/// The snapshot captured at creation. Never recomputed.
	pub fn first(&self) -> &T {
		&self.first
	}

	/// The most recently committed snapshot.
	pub fn latest(&self) -> &T {
		self.latest.value()
	}

	pub fn is_expired(&self, now: Instant) -> bool {
		self.latest.is_expired(now)
	}

	pub fn expires_at(&self) -> Option<Instant> {
		self.latest.expires_at()
	}

	/// Previously committed snapshots, oldest first.
	pub fn history(&self) -> &HistoryRing<T> {
		&self.history
	}

	/// Number of commits since creation.
	pub fn commits(&self) -> u64 {
		self.commits
	}

	pub fn is_pending(&self) -> bool {
		self.recompute.is_pending()
	}

	pub fn due_at(&self) -> Option<Instant> {
		self.recompute.due_at()
	}

	/// Commits `value` as the latest snapshot and restarts its TTL.
	pub fn commit(&mut self, value: T, now: Instant) {
		let previous = self.latest.replace(value, self.ttl, now);
		self.history.push(previous);
		self.commits += 1;
	}

	/// Edits the latest snapshot in place. Does not count as a commit.
	pub fn amend(&mut self, f: impl FnOnce(&mut T)) {
		self.latest.amend(f);
	}

	/// Schedules a debounced recompute, superseding any pending one.
	pub fn schedule(&mut self, producer: Producer<T>, now: Instant) {
		self.recompute.schedule(producer, now);
	}

	/// Fires a due recompute and commits its value.
	pub fn poll(&mut self, now: Instant) -> StorePoll {
		match self.recompute.poll(now) {
			Recompute::Idle => StorePoll::Idle,
			Recompute::Waiting => StorePoll::Waiting,
			Recompute::Ready(value) => {
				self.commit(value, now);
				StorePoll::Committed
			}
			Recompute::Disconnected => StorePoll::Dropped,
		}
	}
}
