//! Structural consistency checks.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::ids::{NodeId, NodeIdentity};
use crate::tree::MirrorTree;

/// A broken parent/child or depth link.
///
/// Seeing one of these means an earlier operation breached an invariant;
/// graft and ungraft treat it as a programmer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralViolation {
	#[error("root {node} has a parent")]
	RootHasParent { node: NodeIdentity },

	#[error("root {node} has depth {found}, expected {expected}")]
	RootDepth { node: NodeIdentity, expected: i32, found: i32 },

	#[error("{node} has depth {found}, expected {expected}")]
	DepthMismatch { node: NodeIdentity, expected: i32, found: i32 },

	#[error("{child} is listed under {parent} but points at {found:?}")]
	ParentMismatch {
		parent: NodeIdentity,
		child: NodeIdentity,
		found: Option<NodeId>,
	},

	#[error("{parent} lists child {child}, which no longer exists")]
	DanglingChild { parent: NodeIdentity, child: NodeId },

	#[error("{node} is listed more than once")]
	SharedChild { node: NodeIdentity },

	#[error("{node} is linked into the tree but unreachable from any root")]
	Unreachable { node: NodeIdentity },
}

impl<N> MirrorTree<N> {
	/// Checks every structural invariant of the tree.
	///
	/// - roots have no parent and sit at the configured root depth
	/// - every listed child exists, points back at its parent, and is one level deeper
	/// - no node is listed twice
	/// - every node with links is reachable from a root
	///
	/// Detached synthetic nodes (no parent, no children, not a root) are ignored.
	pub fn verify_structure(&self) -> Result<(), StructuralViolation> {
		let mut seen = FxHashSet::default();
		let mut stack = Vec::new();

		for &root in self.roots() {
			let Some(node) = self.node(root) else {
				continue;
			};
			if node.parent.is_some() {
				return Err(StructuralViolation::RootHasParent { node: node.identity });
			}
			if node.depth != self.config.root_depth {
				return Err(StructuralViolation::RootDepth {
					node: node.identity,
					expected: self.config.root_depth,
					found: node.depth,
				});
			}
			if !seen.insert(root) {
				return Err(StructuralViolation::SharedChild { node: node.identity });
			}
			stack.push(root);
		}

		while let Some(id) = stack.pop() {
			let Some(node) = self.node(id) else {
				continue;
			};
			for &child_id in node.children() {
				let Some(child) = self.node(child_id) else {
					return Err(StructuralViolation::DanglingChild {
						parent: node.identity,
						child: child_id,
					});
				};
				if child.parent != Some(id) {
					return Err(StructuralViolation::ParentMismatch {
						parent: node.identity,
						child: child.identity,
						found: child.parent,
					});
				}
				let expected = node.depth.saturating_add(1);
				if child.depth != expected {
					return Err(StructuralViolation::DepthMismatch {
						node: child.identity,
						expected,
						found: child.depth,
					});
				}
				if !seen.insert(child_id) {
					return Err(StructuralViolation::SharedChild { node: child.identity });
				}
				stack.push(child_id);
			}
		}

		for (slot, node) in self.nodes_iter() {
			let linked = node.parent.is_some() || !node.children.is_empty();
			if linked && !seen.contains(&slot) {
				return Err(StructuralViolation::Unreachable { node: node.identity });
			}
		}
		Ok(())
	}
}
