//! Wrapper node of the mirror tree.

use std::time::Instant;

use smallvec::SmallVec;
use umbra_primitives::{HistoryRing, SnapshotStore, StorePolicy};

use crate::ids::{NodeId, NodeIdentity};
use crate::live::LiveHandle;
use crate::snapshot::{Issue, IssueSet, NodeSnapshot, PropertyKey, PropertyValue};

/// How a node came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrigin {
	/// Built from a live node by [`crate::TreeBuilder`].
	Mirrored,
	/// Created by the consumer for grouping; has no live counterpart.
	Synthetic,
}

pub(crate) type Children = SmallVec<[NodeId; 4]>;

/// Mirror of one live node.
///
/// Structural fields are only mutated by [`crate::MirrorTree`]. The node is
/// updated in place by recomputes, so a [`NodeId`] held by a consumer stays
/// valid until the node's owner drops it.
#[derive(Debug)]
pub struct MirrorNode<N> {
	pub(crate) identity: NodeIdentity,
	pub(crate) origin: NodeOrigin,
	pub(crate) depth: i32,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Children,
	pub(crate) live: LiveHandle<N>,
	pub(crate) store: SnapshotStore<NodeSnapshot>,
	pub(crate) lost_connection: bool,
}

impl<N> MirrorNode<N> {
	pub(crate) fn new(
		identity: NodeIdentity,
		origin: NodeOrigin,
		live: LiveHandle<N>,
		first: NodeSnapshot,
		policy: StorePolicy,
		now: Instant,
	) -> Self {
		let lost_connection = first.issues.contains(&Issue::LostConnection);
		Self {
			identity,
			origin,
			depth: 0,
			parent: None,
			children: Children::new(),
			live,
			store: SnapshotStore::new(first, policy, now),
			lost_connection,
		}
	}

	pub fn identity(&self) -> NodeIdentity {
		self.identity
	}

	pub fn origin(&self) -> NodeOrigin {
		self.origin
	}

	pub fn is_synthetic(&self) -> bool {
		self.origin == NodeOrigin::Synthetic
	}

	pub fn depth(&self) -> i32 {
		self.depth
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	pub fn live(&self) -> &LiveHandle<N> {
		&self.live
	}

	/// `true` once the live node has been observed to be gone. Never reset.
	pub fn is_lost_connection(&self) -> bool {
		self.lost_connection
	}

	/// Identity facts captured at construction.
	pub fn first_snapshot(&self) -> &NodeSnapshot {
		self.store.first()
	}

	/// Latest committed snapshot, without any staleness check.
	pub fn cached(&self) -> &NodeSnapshot {
		self.store.latest()
	}

	pub fn cached_property(&self, key: &PropertyKey) -> &PropertyValue {
		self.store.latest().property(key)
	}

	pub fn cached_issues(&self) -> &IssueSet {
		&self.store.latest().issues
	}

	/// Previously committed snapshots, oldest first.
	pub fn history(&self) -> &HistoryRing<NodeSnapshot> {
		self.store.history()
	}

	pub fn is_recompute_pending(&self) -> bool {
		self.store.is_pending()
	}

	/// Flags the node as disconnected. Idempotent.
	pub(crate) fn mark_lost(&mut self) -> bool {
		if self.lost_connection {
			return false;
		}
		self.lost_connection = true;
		self.store.amend(|snapshot| {
			snapshot.issues.insert(Issue::LostConnection);
		});
		true
	}
}
