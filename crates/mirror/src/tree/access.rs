//! Staleness-checked accessors.
//!
//! Every accessor returns the cached value unconditionally. On the way it
//! checks the node's connection and, once the latest snapshot has expired,
//! compares the live value against the cache. A mismatch schedules a
//! debounced full re-extraction; the fresh snapshot is committed later by
//! [`MirrorTree::tick`].

use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace};

use super::MirrorTree;
use crate::ids::NodeId;
use crate::live::LiveNode;
use crate::snapshot::{IssueSet, NodeSnapshot, PropertyKey, PropertyValue};

/// What an accessor compares against the live node once the cache is stale.
#[derive(Clone, Copy)]
enum Probe<'a> {
	Property(&'a PropertyKey),
	AllProperties,
}

impl<N: LiveNode> MirrorTree<N> {
	/// Cached value of `key`, scheduling a recompute if the live value moved.
	///
	/// Returns `None` only for an unknown `id`. A property the node does not
	/// carry reads as [`PropertyValue::Missing`].
	pub fn property(&mut self, id: NodeId, key: &PropertyKey, now: Instant) -> Option<&PropertyValue> {
		self.observe(id, Probe::Property(key), now);
		self.node(id).map(|node| node.cached_property(key))
	}

	/// Latest cached snapshot, scheduling a recompute if any cached property moved.
	pub fn snapshot(&mut self, id: NodeId, now: Instant) -> Option<&NodeSnapshot> {
		self.observe(id, Probe::AllProperties, now);
		self.node(id).map(|node| node.cached())
	}

	/// Structural issues of the latest snapshot, including lost connection.
	pub fn issues(&mut self, id: NodeId, now: Instant) -> Option<&IssueSet> {
		self.observe(id, Probe::AllProperties, now);
		self.node(id).map(|node| node.cached_issues())
	}

	/// Checks whether the live node still resolves, flagging the node if not.
	///
	/// Returns the node's lost-connection state after the check.
	pub fn probe_connection(&mut self, id: NodeId) -> Option<bool> {
		let node = self.node_mut(id)?;
		if !node.lost_connection && !node.live.is_detached() && !node.live.is_alive() && node.mark_lost() {
			debug!(identity = %node.identity, "mirror.lost_connection");
		}
		Some(node.lost_connection)
	}

	fn observe(&mut self, id: NodeId, probe: Probe<'_>, now: Instant) {
		let extract = Rc::clone(&self.extract);
		let Some(node) = self.node_mut(id) else {
			return;
		};
		// Synthetic nodes have nothing to read; lost nodes are never retried.
		if node.lost_connection || node.live.is_detached() {
			return;
		}
		let Some(live) = node.live.resolve() else {
			if node.mark_lost() {
				debug!(identity = %node.identity, depth = node.depth, "mirror.lost_connection");
			}
			return;
		};
		if !node.store.is_expired(now) || node.store.is_pending() {
			return;
		}

		let moved = match probe {
			Probe::Property(key) => live.read_property(key).unwrap_or_default() != *node.cached_property(key),
			Probe::AllProperties => node
				.cached()
				.properties
				.iter()
				.any(|(key, cached)| live.read_property(key).unwrap_or_default() != *cached),
		};
		if !moved {
			return;
		}

		let handle = node.live.clone();
		node.store.schedule(Box::new(move || handle.resolve().map(|live| extract(&*live))), now);
		trace!(identity = %node.identity, "mirror.recompute.scheduled");
	}
}
