//! Mirrors live subtrees into a [`MirrorTree`].

use std::rc::Rc;
use std::time::Instant;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::config::MirrorConfig;
use crate::ids::{NodeId, NodeIdentity};
use crate::live::{LiveHandle, LiveNode};
use crate::node::{MirrorNode, NodeOrigin};
use crate::snapshot::{Extractor, NodeSnapshot};
use crate::tree::{MirrorTree, Placement};

/// Builds a [`MirrorTree`] from live roots.
pub struct TreeBuilder<N> {
	config: MirrorConfig,
	extract: Extractor<N>,
}

impl<N: LiveNode> TreeBuilder<N> {
	pub fn new(config: MirrorConfig, extract: Extractor<N>) -> Self {
		Self { config, extract }
	}

	/// Mirrors every root and its current descendants, eagerly and top-down.
	///
	/// Unresolvable roots still produce a node, flagged as lost and carrying
	/// [`NodeSnapshot::disconnected`] defaults.
	pub fn build(&self, roots: &[LiveHandle<N>], now: Instant) -> MirrorTree<N> {
		let mut tree = MirrorTree::new(self.config.clone(), Rc::clone(&self.extract));
		for root in roots {
			tree.mirror_subtree(None, root.clone(), now);
		}
		debug!(roots = tree.roots().len(), nodes = tree.len(), "mirror.build.done");
		tree
	}

	/// Mirrors a live subtree that appeared after `tree` was built.
	pub fn append(&self, tree: &mut MirrorTree<N>, parent: Option<NodeId>, live: &Rc<N>, now: Instant) -> Option<NodeId> {
		tree.mirror_subtree(parent, LiveHandle::new(live), now)
	}
}

impl<N: LiveNode> MirrorTree<N> {
	/// Mirrors `live` and its descendants, appending it to `parent`'s children
	/// or to the roots.
	///
	/// Live nodes already mirrored in this tree are skipped along with their
	/// subtrees. Returns the new node, or `None` if `parent` is unknown, is a
	/// detached synthetic node, or the top node was skipped.
	pub fn mirror_subtree(&mut self, parent: Option<NodeId>, live: LiveHandle<N>, now: Instant) -> Option<NodeId> {
		let base_depth = match parent {
			Some(parent) => {
				if self.placement(parent)? == Placement::Detached {
					debug!(node = %parent, "mirror.build.detached_parent");
					return None;
				}
				self.node(parent)?.depth.saturating_add(1)
			}
			None => self.config.root_depth,
		};
		let policy = self.config.store_policy();
		let mut visited = FxHashSet::default();
		let mut top = None;
		let mut created = 0usize;

		let mut stack = vec![(live, parent, base_depth)];
		while let Some((handle, parent, depth)) = stack.pop() {
			let (identity, first, children) = match handle.resolve() {
				Some(node) => {
					let identity = NodeIdentity::Live(node.live_id());
					if self.find(&identity).is_some() || !visited.insert(identity) {
						warn!(%identity, "mirror.build.duplicate");
						continue;
					}
					(identity, (self.extract)(&*node), node.live_children())
				}
				None => (NodeIdentity::next_local(), NodeSnapshot::disconnected(), Vec::new()),
			};

			let mut mirror = MirrorNode::new(identity, NodeOrigin::Mirrored, handle, first, policy, now);
			mirror.depth = depth;
			mirror.parent = parent;
			let id = self.insert(mirror);
			match parent {
				Some(parent) => {
					if let Some(parent) = self.node_mut(parent) {
						parent.children.push(id);
					}
				}
				None => self.roots.push(id),
			}
			top.get_or_insert(id);
			created += 1;

			stack.extend(children.iter().rev().map(|child| (LiveHandle::new(child), Some(id), depth.saturating_add(1))));
		}

		if let Some(top) = top {
			debug!(node = %top, depth = base_depth, created, "mirror.build.subtree");
		}
		top
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::live::LiveId;
	use crate::snapshot::PropertyValue;
	use crate::test_support::{FakeNode, extractor};

	fn builder() -> TreeBuilder<FakeNode> {
		TreeBuilder::new(MirrorConfig::default(), extractor())
	}

	#[test]
	fn builds_children_in_host_order() {
		let root = FakeNode::new(1, "Window");
		let a = root.add_child(FakeNode::new(2, "Stack"));
		root.add_child(FakeNode::new(3, "Label"));
		a.add_child(FakeNode::new(4, "Button"));

		let tree = builder().build(&[LiveHandle::new(&root)], Instant::now());

		assert_eq!(tree.len(), 4);
		let order: Vec<_> = tree.walk().map(|id| tree.identity(id).unwrap()).collect();
		assert_eq!(
			order,
			vec![
				NodeIdentity::Live(LiveId(1)),
				NodeIdentity::Live(LiveId(2)),
				NodeIdentity::Live(LiveId(4)),
				NodeIdentity::Live(LiveId(3)),
			]
		);
		let depths: Vec<_> = tree.walk().map(|id| tree.depth(id).unwrap()).collect();
		assert_eq!(depths, vec![0, 1, 2, 1]);
	}

	#[test]
	fn first_snapshot_captures_identity_facts() {
		let root = FakeNode::new(1, "Window").with_property("title", "Main");
		let tree = builder().build(&[LiveHandle::new(&root)], Instant::now());

		let node = tree.node(tree.roots()[0]).unwrap();
		assert_eq!(node.first_snapshot().class_name, "Window");
		assert_eq!(node.cached_property(&"title".into()), &PropertyValue::from("Main"));
		assert!(!node.is_lost_connection());
		assert!(!node.is_synthetic());
	}

	#[test]
	fn root_offset_is_applied() {
		let config = MirrorConfig {
			root_depth: 5,
			..MirrorConfig::default()
		};
		let root = FakeNode::new(1, "Window");
		root.add_child(FakeNode::new(2, "View"));

		let tree = TreeBuilder::new(config, extractor()).build(&[LiveHandle::new(&root)], Instant::now());
		let child = tree.children(tree.roots()[0])[0];
		assert_eq!(tree.depth(tree.roots()[0]), Some(5));
		assert_eq!(tree.depth(child), Some(6));
	}

	#[test]
	fn unresolvable_root_is_disconnected_not_fatal() {
		let gone = FakeNode::new(9, "Ghost");
		let handle = LiveHandle::new(&gone);
		drop(gone);

		let tree = builder().build(&[handle, LiveHandle::detached()], Instant::now());

		assert_eq!(tree.roots().len(), 2);
		for &root in tree.roots() {
			let node = tree.node(root).unwrap();
			assert!(node.is_lost_connection());
			assert_eq!(node.first_snapshot(), &NodeSnapshot::disconnected());
			assert!(matches!(node.identity(), NodeIdentity::Local(_)));
		}
	}

	#[test]
	fn shared_live_node_is_mirrored_once() {
		let root = FakeNode::new(1, "Window");
		let shared = FakeNode::new(2, "Shared");
		root.add_child(Rc::clone(&shared));
		root.add_child(Rc::clone(&shared));

		let tree = builder().build(&[LiveHandle::new(&root)], Instant::now());
		assert_eq!(tree.len(), 2);
		assert_eq!(tree.children(tree.roots()[0]).len(), 1);
	}

	#[test]
	fn mirror_subtree_appends_under_parent() {
		let root = FakeNode::new(1, "Window");
		let mut tree = builder().build(&[LiveHandle::new(&root)], Instant::now());
		let root_id = tree.roots()[0];

		let late = root.add_child(FakeNode::new(2, "Sheet"));
		late.add_child(FakeNode::new(3, "Field"));

		let now = Instant::now() + Duration::from_millis(5);
		let sheet = tree.mirror_subtree(Some(root_id), LiveHandle::new(&late), now).unwrap();

		assert_eq!(tree.children(root_id), &[sheet]);
		assert_eq!(tree.depth(sheet), Some(1));
		assert_eq!(tree.depth(tree.children(sheet)[0]), Some(2));
		assert!(tree.verify_structure().is_ok());

		// Mirroring the same live node again is a no-op.
		assert_eq!(tree.mirror_subtree(Some(root_id), LiveHandle::new(&late), now), None);
	}

	#[test]
	fn extreme_root_depth_saturates() {
		let config = MirrorConfig {
			root_depth: i32::MAX,
			..MirrorConfig::default()
		};
		let root = FakeNode::new(1, "Window");
		root.add_child(FakeNode::new(2, "View")).add_child(FakeNode::new(3, "Text"));

		let mut tree = TreeBuilder::new(config, extractor()).build(&[LiveHandle::new(&root)], Instant::now());
		let depths: Vec<_> = tree.walk().map(|id| tree.depth(id).unwrap()).collect();
		assert_eq!(depths, vec![i32::MAX; 3]);

		let view = tree.find(&NodeIdentity::Live(LiveId(2))).unwrap();
		let group = tree.create_synthetic(NodeSnapshot::new("Group"), Instant::now());
		tree.graft(view, group).unwrap();
		assert_eq!(tree.depth(view), Some(i32::MAX));
		assert_eq!(tree.verify_structure(), Ok(()));
	}

	#[test]
	fn detached_synthetic_parent_is_refused() {
		let root = FakeNode::new(1, "Window");
		let mut tree = builder().build(&[LiveHandle::new(&root)], Instant::now());
		let group = tree.create_synthetic(NodeSnapshot::new("Group"), Instant::now());

		let late = FakeNode::new(2, "Sheet");
		late.add_child(FakeNode::new(3, "Field"));
		assert_eq!(tree.mirror_subtree(Some(group), LiveHandle::new(&late), Instant::now()), None);

		assert_eq!(tree.len(), 2);
		assert!(tree.children(group).is_empty());
		assert_eq!(tree.find(&NodeIdentity::Live(LiveId(2))), None);
		assert_eq!(tree.verify_structure(), Ok(()));
		let window = tree.roots()[0];
		assert!(tree.graft(window, group).is_ok());
	}

	#[test]
	fn append_without_parent_adds_a_root() {
		let builder = builder();
		let first = FakeNode::new(1, "Window");
		let mut tree = builder.build(&[LiveHandle::new(&first)], Instant::now());

		let second = FakeNode::new(2, "Panel");
		second.add_child(FakeNode::new(3, "Row"));
		let panel = builder.append(&mut tree, None, &second, Instant::now()).unwrap();

		assert_eq!(tree.roots().len(), 2);
		assert_eq!(tree.roots()[1], panel);
		assert_eq!(tree.depth(tree.children(panel)[0]), Some(1));
		assert_eq!(tree.find(&NodeIdentity::Live(LiveId(3))), Some(tree.children(panel)[0]));
	}
}
