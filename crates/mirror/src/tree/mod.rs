//! The mirror tree: an arena of [`MirrorNode`]s with roots and an identity index.
//!
//! Nodes live in a [`Slab`] and reference each other by generational
//! [`NodeId`]. Children are owned: removing a node frees its whole subtree.
//! Parent links are plain keys, so there are no reference cycles.
//!
//! # Modules
//!
//! - `access` - staleness-checked property accessors
//! - `tick` - run-loop step that fires due recomputes
//! - `traverse` - pre-order and ancestor iterators

mod access;
mod tick;
mod traverse;

use std::fmt;

use rustc_hash::FxHashMap;
use slab::Slab;
use tracing::debug;
use umbra_primitives::HistoryRing;

pub use self::tick::TickStats;
pub use self::traverse::{Ancestors, PreOrder};
use crate::config::MirrorConfig;
use crate::ids::{NodeId, NodeIdentity};
use crate::node::{Children, MirrorNode};
use crate::snapshot::{Extractor, NodeSnapshot};

/// Where a node sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
	/// Index into the root collection.
	Root(usize),
	/// Index into `parent`'s children.
	Child { parent: NodeId, slot: usize },
	/// Has a parent that does not list it as a child.
	Orphaned { parent: NodeId },
	/// Neither a root nor anyone's child.
	Detached,
}

pub struct MirrorTree<N> {
	nodes: Slab<MirrorNode<N>>,
	/// Generation per slab slot, bumped on free.
	generations: Vec<u32>,
	pub(crate) roots: Children,
	index: FxHashMap<NodeIdentity, NodeId>,
	pub(crate) extract: Extractor<N>,
	pub(crate) config: MirrorConfig,
}

impl<N> fmt::Debug for MirrorTree<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MirrorTree")
			.field("nodes", &self.nodes.len())
			.field("roots", &self.roots)
			.field("config", &self.config)
			.finish()
	}
}

impl<N> MirrorTree<N> {
	/// Creates an empty tree. Use [`crate::TreeBuilder`] to populate it from live roots.
	pub fn new(config: MirrorConfig, extract: Extractor<N>) -> Self {
		Self {
			nodes: Slab::new(),
			generations: Vec::new(),
			roots: Children::new(),
			index: FxHashMap::default(),
			extract,
			config,
		}
	}

	pub fn config(&self) -> &MirrorConfig {
		&self.config
	}

	/// Number of nodes, including detached synthetic ones.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn roots(&self) -> &[NodeId] {
		&self.roots
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.node(id).is_some()
	}

	pub fn node(&self, id: NodeId) -> Option<&MirrorNode<N>> {
		if *self.generations.get(id.slot())? != id.generation {
			return None;
		}
		self.nodes.get(id.slot())
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut MirrorNode<N>> {
		if *self.generations.get(id.slot())? != id.generation {
			return None;
		}
		self.nodes.get_mut(id.slot())
	}

	/// Looks up a node by its stable identity.
	pub fn find(&self, identity: &NodeIdentity) -> Option<NodeId> {
		self.index.get(identity).copied().filter(|id| self.contains(*id))
	}

	pub fn identity(&self, id: NodeId) -> Option<NodeIdentity> {
		self.node(id).map(MirrorNode::identity)
	}

	pub fn depth(&self, id: NodeId) -> Option<i32> {
		self.node(id).map(MirrorNode::depth)
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.node(id)?.parent
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.node(id).map(MirrorNode::children).unwrap_or_default()
	}

	/// Previously committed snapshots of `id`, oldest first.
	pub fn history(&self, id: NodeId) -> Option<&HistoryRing<NodeSnapshot>> {
		self.node(id).map(MirrorNode::history)
	}

	/// Identities of disconnected nodes, in tree order.
	pub fn lost_connections(&self) -> impl Iterator<Item = NodeIdentity> + '_ {
		self.walk()
			.filter_map(|id| self.node(id).filter(|n| n.is_lost_connection()).map(MirrorNode::identity))
	}

	/// Every node in the arena, attached or not, in slot order.
	pub(crate) fn nodes_iter(&self) -> impl Iterator<Item = (NodeId, &MirrorNode<N>)> {
		self.nodes
			.iter()
			.map(|(slot, node)| (NodeId::new(slot, self.generations[slot]), node))
	}

	pub(crate) fn insert(&mut self, node: MirrorNode<N>) -> NodeId {
		let identity = node.identity;
		let slot = self.nodes.insert(node);
		if slot >= self.generations.len() {
			self.generations.resize(slot + 1, 0);
		}
		let id = NodeId::new(slot, self.generations[slot]);
		self.index.insert(identity, id);
		id
	}

	/// Frees one slot. Does not touch links pointing at it.
	fn free(&mut self, id: NodeId) -> Option<MirrorNode<N>> {
		self.node(id)?;
		let node = self.nodes.remove(id.slot());
		self.generations[id.slot()] = self.generations[id.slot()].wrapping_add(1);
		if self.index.get(&node.identity) == Some(&id) {
			self.index.remove(&node.identity);
		}
		Some(node)
	}

	pub(crate) fn placement(&self, id: NodeId) -> Option<Placement> {
		let node = self.node(id)?;
		Some(match node.parent {
			Some(parent) => match self.node(parent).and_then(|p| p.children.iter().position(|&c| c == id)) {
				Some(slot) => Placement::Child { parent, slot },
				None => Placement::Orphaned { parent },
			},
			None => match self.roots.iter().position(|&r| r == id) {
				Some(at) => Placement::Root(at),
				None => Placement::Detached,
			},
		})
	}

	/// Assigns `depth` to `id` and `depth + k` to every descendant `k` levels down.
	///
	/// Structural operations call this last, after all links are in place.
	pub(crate) fn set_depth(&mut self, id: NodeId, depth: i32) {
		let mut stack = vec![(id, depth)];
		while let Some((id, depth)) = stack.pop() {
			let Some(node) = self.node_mut(id) else {
				continue;
			};
			node.depth = depth;
			stack.extend(node.children.iter().map(|&child| (child, depth.saturating_add(1))));
		}
	}

	/// Removes `id` and its whole subtree. Returns the number of nodes dropped.
	pub fn remove(&mut self, id: NodeId) -> Option<usize> {
		match self.placement(id)? {
			Placement::Root(at) => {
				self.roots.remove(at);
			}
			Placement::Child { parent, slot } => {
				if let Some(parent) = self.node_mut(parent) {
					parent.children.remove(slot);
				}
			}
			Placement::Orphaned { .. } | Placement::Detached => {}
		}

		let doomed: Vec<NodeId> = self.subtree(id).collect();
		for &node in &doomed {
			self.free(node);
		}
		debug!(node = %id, dropped = doomed.len(), "mirror.remove");
		Some(doomed.len())
	}
}
