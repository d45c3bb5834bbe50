//! Coalescing recompute scheduler.
//!
//! [`DebouncedRecompute`] holds at most one pending producer. Each call to
//! [`DebouncedRecompute::schedule`] replaces it and pushes the deadline out
//! by the configured delay, so a burst of requests collapses into a single
//! invocation of the last producer supplied.
//!
//! The scheduler never reads a clock. The owner passes `now` into both
//! `schedule` and `poll`, which keeps the timeline explicit and lets the
//! host's event loop decide when deadlines are checked.

use std::fmt;
use std::time::{Duration, Instant};

/// Deferred computation of a fresh value. `None` means the source could not
/// be reached and nothing should be committed.
pub type Producer<T> = Box<dyn FnOnce() -> Option<T>>;

struct Pending<T> {
	due: Instant,
	producer: Producer<T>,
}

/// Result of polling a [`DebouncedRecompute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recompute<T> {
	/// Nothing is scheduled.
	Idle,
	/// A producer is scheduled but its deadline has not passed.
	Waiting,
	/// The producer ran and yielded a value.
	Ready(T),
	/// The producer ran but could not reach its source.
	Disconnected,
}

/// Debounced, single-slot recompute scheduler.
pub struct DebouncedRecompute<T> {
	delay: Duration,
	pending: Option<Pending<T>>,
	/// Producers replaced before they could fire.
	superseded: u64,
}

impl<T> fmt::Debug for DebouncedRecompute<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DebouncedRecompute")
			.field("delay", &self.delay)
			.field("due", &self.pending.as_ref().map(|p| p.due))
			.field("superseded", &self.superseded)
			.finish()
	}
}

impl<T> DebouncedRecompute<T> {
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			pending: None,
			superseded: 0,
		}
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Replaces any pending producer and restarts the delay from `now`.
	pub fn schedule(&mut self, producer: Producer<T>, now: Instant) {
		let due = now.checked_add(self.delay).unwrap_or(now);
		if self.pending.replace(Pending { due, producer }).is_some() {
			self.superseded += 1;
			tracing::trace!(superseded = self.superseded, "debounce.superseded");
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Deadline of the pending producer, if any.
	pub fn due_at(&self) -> Option<Instant> {
		self.pending.as_ref().map(|p| p.due)
	}

	/// Number of producers that were replaced before firing.
	pub fn superseded(&self) -> u64 {
		self.superseded
	}

	/// Fires the pending producer if its deadline has passed.
	///
	/// The producer is consumed whether or not it yields a value.
	pub fn poll(&mut self, now: Instant) -> Recompute<T> {
		match self.pending.take() {
			None => Recompute::Idle,
			Some(pending) if now < pending.due => {
				self.pending = Some(pending);
				Recompute::Waiting
			}
			Some(pending) => match (pending.producer)() {
				Some(value) => Recompute::Ready(value),
				None => Recompute::Disconnected,
			},
		}
	}
}
