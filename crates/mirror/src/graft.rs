//! Tree surgery: inserting and removing synthetic intermediate nodes.
//!
//! [`MirrorTree::graft`] puts a synthetic node `S` between an existing node
//! `E` and its parent `P`; [`MirrorTree::ungraft`] undoes it. Both touch only
//! the one slot that held `E` (or `S`) and fix depth last, through the
//! cascading depth mutator, once every link is already correct.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use crate::ids::{NodeId, NodeIdentity};
use crate::live::LiveHandle;
use crate::node::{MirrorNode, NodeOrigin};
use crate::snapshot::NodeSnapshot;
use crate::tree::{MirrorTree, Placement};

/// Rejected graft or ungraft request. The tree is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraftError {
	#[error("node {0} is not in the tree")]
	UnknownNode(NodeId),
	#[error("cannot graft node {0} onto itself")]
	SameNode(NodeId),
	#[error("node {0} is not synthetic")]
	NotSynthetic(NodeId),
	#[error("synthetic node {0} is already attached")]
	AlreadyAttached(NodeId),
	#[error("node {0} is not attached to the tree")]
	Detached(NodeId),
	#[error("synthetic node {node} has {count} children, expected exactly one")]
	NotSingleChild { node: NodeId, count: usize },
}

/// Where the re-homed node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraftOutcome {
	/// The node whose parent changed.
	pub child: NodeId,
	/// Parent of the slot that was rewritten; `None` for the root collection.
	pub parent: Option<NodeId>,
	/// Index of the rewritten slot.
	pub slot: usize,
}

pub type GraftResult = Result<GraftOutcome, GraftError>;

impl<N> MirrorTree<N> {
	/// Creates a detached synthetic node, ready to be grafted.
	pub fn create_synthetic(&mut self, snapshot: NodeSnapshot, now: Instant) -> NodeId {
		let identity = NodeIdentity::next_local();
		let mut node = MirrorNode::new(
			identity,
			NodeOrigin::Synthetic,
			LiveHandle::detached(),
			snapshot,
			self.config.store_policy(),
			now,
		);
		node.depth = self.config.root_depth;
		let id = self.insert(node);
		debug!(node = %id, %identity, "mirror.synthetic.created");
		id
	}

	/// Inserts detached synthetic node `synthetic` between `existing` and its parent.
	///
	/// `synthetic` takes over `existing`'s slot and depth; `existing` and its
	/// descendants move one level down. A root `existing` is replaced in the
	/// root collection instead.
	pub fn graft(&mut self, existing: NodeId, synthetic: NodeId) -> GraftResult {
		if existing == synthetic {
			return Err(GraftError::SameNode(existing));
		}
		let s = self.node(synthetic).ok_or(GraftError::UnknownNode(synthetic))?;
		if !s.is_synthetic() {
			return Err(GraftError::NotSynthetic(synthetic));
		}
		if !s.children.is_empty() || self.placement(synthetic) != Some(Placement::Detached) {
			return Err(GraftError::AlreadyAttached(synthetic));
		}
		let placement = self.placement(existing).ok_or(GraftError::UnknownNode(existing))?;
		let old_depth = self.depth(existing).ok_or(GraftError::UnknownNode(existing))?;
		self.debug_assert_linked(existing, placement);

		let (parent, slot) = match placement {
			Placement::Detached => return Err(GraftError::Detached(existing)),
			Placement::Root(at) => {
				self.roots[at] = synthetic;
				(None, at)
			}
			Placement::Child { parent, slot } => {
				if let Some(p) = self.node_mut(parent) {
					p.children[slot] = synthetic;
				}
				(Some(parent), slot)
			}
			Placement::Orphaned { parent } => {
				warn!(node = %existing, parent = %parent, "mirror.graft.orphaned");
				self.roots.push(synthetic);
				(None, self.roots.len() - 1)
			}
		};

		if let Some(s) = self.node_mut(synthetic) {
			s.parent = parent;
			s.children.clear();
			s.children.push(existing);
		}
		if let Some(e) = self.node_mut(existing) {
			e.parent = Some(synthetic);
		}
		self.set_depth(synthetic, old_depth);

		debug!(node = %existing, synthetic = %synthetic, depth = old_depth, slot, "mirror.graft");
		Ok(GraftOutcome {
			child: existing,
			parent,
			slot,
		})
	}

	/// Removes a grafted synthetic node, splicing its single child back into its slot.
	///
	/// The child returns to the synthetic node's depth and the synthetic node
	/// is dropped.
	pub fn ungraft(&mut self, synthetic: NodeId) -> GraftResult {
		let s = self.node(synthetic).ok_or(GraftError::UnknownNode(synthetic))?;
		if !s.is_synthetic() {
			return Err(GraftError::NotSynthetic(synthetic));
		}
		let &[child] = s.children.as_slice() else {
			return Err(GraftError::NotSingleChild {
				node: synthetic,
				count: s.children.len(),
			});
		};
		let depth = s.depth;
		debug_assert_eq!(
			self.parent(child),
			Some(synthetic),
			"structural violation: child of {synthetic} points elsewhere"
		);
		let placement = self.placement(synthetic).ok_or(GraftError::UnknownNode(synthetic))?;
		self.debug_assert_linked(synthetic, placement);

		let (parent, slot) = match placement {
			Placement::Detached => return Err(GraftError::Detached(synthetic)),
			Placement::Root(at) => {
				self.roots[at] = child;
				(None, at)
			}
			Placement::Child { parent, slot } => {
				if let Some(p) = self.node_mut(parent) {
					p.children[slot] = child;
				}
				(Some(parent), slot)
			}
			Placement::Orphaned { parent } => {
				warn!(node = %synthetic, parent = %parent, "mirror.ungraft.orphaned");
				self.roots.push(child);
				(None, self.roots.len() - 1)
			}
		};

		if let Some(c) = self.node_mut(child) {
			c.parent = parent;
		}
		if let Some(s) = self.node_mut(synthetic) {
			s.parent = None;
			s.children.clear();
		}
		self.remove(synthetic);
		self.set_depth(child, depth);

		debug!(node = %child, synthetic = %synthetic, depth, slot, "mirror.ungraft");
		Ok(GraftOutcome { child, parent, slot })
	}

	fn debug_assert_linked(&self, id: NodeId, placement: Placement) {
		debug_assert!(
			!matches!(placement, Placement::Orphaned { .. }),
			"structural violation: {id} points at a parent that does not list it"
		);
	}
}
