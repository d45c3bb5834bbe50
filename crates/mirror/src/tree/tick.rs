//! Run-loop step.

use std::time::Instant;

use tracing::{debug, trace};
use umbra_primitives::StorePoll;

use super::MirrorTree;

/// What a single [`MirrorTree::tick`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
	/// Recomputes whose deadline had passed.
	pub fired: usize,
	/// Recomputes that produced and committed a snapshot.
	pub committed: usize,
	/// Recomputes dropped because the live node was gone.
	pub dropped: usize,
}

impl<N> MirrorTree<N> {
	/// Fires every recompute whose debounce deadline has passed.
	///
	/// Called from the host's event loop, on the same timeline as the accessors.
	pub fn tick(&mut self, now: Instant) -> TickStats {
		let mut stats = TickStats::default();
		for (_, node) in self.nodes.iter_mut() {
			match node.store.poll(now) {
				StorePoll::Idle | StorePoll::Waiting => {}
				StorePoll::Committed => {
					stats.fired += 1;
					stats.committed += 1;
					debug!(identity = %node.identity, commits = node.store.commits(), "mirror.recompute.commit");
				}
				StorePoll::Dropped => {
					stats.fired += 1;
					stats.dropped += 1;
					debug!(identity = %node.identity, "mirror.recompute.disconnected");
					if node.mark_lost() {
						debug!(identity = %node.identity, depth = node.depth, "mirror.lost_connection");
					}
				}
			}
		}
		if stats.fired > 0 {
			trace!(fired = stats.fired, committed = stats.committed, dropped = stats.dropped, "mirror.tick");
		}
		stats
	}

	/// Number of nodes with a scheduled recompute.
	pub fn pending_count(&self) -> usize {
		self.nodes.iter().filter(|(_, node)| node.store.is_pending()).count()
	}

	/// Earliest pending recompute deadline.
	pub fn next_due(&self) -> Option<Instant> {
		self.nodes.iter().filter_map(|(_, node)| node.store.due_at()).min()
	}
}
