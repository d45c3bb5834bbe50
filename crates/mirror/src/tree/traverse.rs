//! Tree traversal.

use super::MirrorTree;
use crate::ids::NodeId;

/// Depth-first, pre-order iterator over node ids.
pub struct PreOrder<'a, N> {
	tree: &'a MirrorTree<N>,
	stack: Vec<NodeId>,
}

impl<N> Iterator for PreOrder<'_, N> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let id = self.stack.pop()?;
		if let Some(node) = self.tree.node(id) {
			self.stack.extend(node.children.iter().rev().copied());
		}
		Some(id)
	}
}

/// Iterator from a node's parent up to its root.
pub struct Ancestors<'a, N> {
	tree: &'a MirrorTree<N>,
	next: Option<NodeId>,
}

impl<N> Iterator for Ancestors<'_, N> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let id = self.next?;
		self.next = self.tree.parent(id);
		Some(id)
	}
}

impl<N> MirrorTree<N> {
	/// Every attached node, roots first, in pre-order.
	pub fn walk(&self) -> PreOrder<'_, N> {
		PreOrder {
			tree: self,
			stack: self.roots.iter().rev().copied().collect(),
		}
	}

	/// `id` followed by all of its descendants, in pre-order.
	pub fn subtree(&self, id: NodeId) -> PreOrder<'_, N> {
		let stack = if self.contains(id) { vec![id] } else { Vec::new() };
		PreOrder { tree: self, stack }
	}

	/// All descendants of `id`, excluding `id` itself.
	pub fn descendants(&self, id: NodeId) -> PreOrder<'_, N> {
		PreOrder {
			tree: self,
			stack: self.children(id).iter().rev().copied().collect(),
		}
	}

	/// Parent, grandparent, and so on up to the root.
	pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, N> {
		Ancestors {
			tree: self,
			next: self.parent(id),
		}
	}
}
