//! Bounded history of previously committed values.

use std::collections::VecDeque;

/// Ring buffer keeping the most recent `capacity` values, oldest evicted first.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
	entries: VecDeque<T>,
	capacity: usize,
}

impl<T> HistoryRing<T> {
	pub fn new(capacity: usize) -> Self {
		Self {
			entries: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Appends `value`, returning the entry evicted to make room.
	///
	/// With zero capacity the value itself is handed back.
	pub fn push(&mut self, value: T) -> Option<T> {
		if self.capacity == 0 {
			return Some(value);
		}
		let evicted = if self.entries.len() == self.capacity {
			self.entries.pop_front()
		} else {
			None
		};
		self.entries.push_back(value);
		evicted
	}

	/// Most recently pushed value.
	pub fn newest(&self) -> Option<&T> {
		self.entries.back()
	}

	/// Iterates oldest to newest.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
		self.entries.iter()
	}

	/// Iterates the last `n` values, oldest to newest.
	pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
		self.entries.iter().skip(self.entries.len().saturating_sub(n))
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn evicts_oldest() {
		let mut ring = HistoryRing::new(3);
		assert_eq!(ring.push(1), None);
		assert_eq!(ring.push(2), None);
		assert_eq!(ring.push(3), None);
		assert_eq!(ring.push(4), Some(1));

		assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
		assert_eq!(ring.newest(), Some(&4));
	}

	#[test]
	fn recent_takes_tail() {
		let mut ring = HistoryRing::new(5);
		for i in 0..5 {
			ring.push(i);
		}
		assert_eq!(ring.recent(2).copied().collect::<Vec<_>>(), vec![3, 4]);
		assert_eq!(ring.recent(10).count(), 5);
	}

	#[test]
	fn zero_capacity_keeps_nothing() {
		let mut ring = HistoryRing::new(0);
		assert_eq!(ring.push("a"), Some("a"));
		assert!(ring.is_empty());
	}

	proptest! {
		#[test]
		fn never_exceeds_capacity(capacity in 0usize..8, values in proptest::collection::vec(any::<u16>(), 0..64)) {
			let mut ring = HistoryRing::new(capacity);
			for v in &values {
				ring.push(*v);
				prop_assert!(ring.len() <= capacity);
			}
			let expected: Vec<u16> = values.iter().copied().skip(values.len().saturating_sub(capacity)).collect();
			prop_assert_eq!(ring.iter().copied().collect::<Vec<_>>(), expected);
		}
	}
}
