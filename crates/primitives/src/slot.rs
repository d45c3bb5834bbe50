//! Single-value TTL cache.

use std::time::{Duration, Instant};

/// The last committed value of `T` and the instant it goes stale.
///
/// Expiry never gates reads: [`ExpiringSlot::value`] always returns the
/// last committed value. Callers use [`ExpiringSlot::is_expired`] as the
/// signal to schedule a recompute.
#[derive(Debug, Clone)]
pub struct ExpiringSlot<T> {
	value: T,
	/// `None` when `now + ttl` is not representable; such a slot never expires.
	expires_at: Option<Instant>,
}

impl<T> ExpiringSlot<T> {
	/// Creates a slot holding `value`, fresh until `now + ttl`.
	pub fn new(value: T, ttl: Duration, now: Instant) -> Self {
		Self {
			value,
			expires_at: now.checked_add(ttl),
		}
	}

	/// Creates a slot that is already stale at `now`.
	pub fn stale(value: T, now: Instant) -> Self {
		Self {
			value,
			expires_at: Some(now),
		}
	}

	/// Returns `true` once `now` has reached the expiration instant.
	pub fn is_expired(&self, now: Instant) -> bool {
		self.expires_at.is_some_and(|at| now >= at)
	}

	/// Returns the last committed value, stale or not.
	pub fn value(&self) -> &T {
		&self.value
	}

	/// Returns the expiration instant, if the slot can expire.
	pub fn expires_at(&self) -> Option<Instant> {
		self.expires_at
	}

	/// Commits `value` and restarts the TTL window. Returns the displaced value.
	pub fn replace(&mut self, value: T, ttl: Duration, now: Instant) -> T {
		self.expires_at = now.checked_add(ttl);
		std::mem::replace(&mut self.value, value)
	}

	/// Edits the committed value in place without touching the deadline.
	pub fn amend(&mut self, f: impl FnOnce(&mut T)) {
		f(&mut self.value);
	}
}
