//! Non-owning references into the host's live tree.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::snapshot::{PropertyKey, PropertyValue};

/// Stable identity of a live node, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LiveId(pub u64);

impl fmt::Display for LiveId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "live#{}", self.0)
	}
}

/// A node owned by the host framework.
///
/// The mirror never owns live nodes. It only holds [`LiveHandle`]s, and every
/// access goes through [`LiveHandle::resolve`], which fails once the host has
/// dropped the node.
pub trait LiveNode: 'static {
	fn live_id(&self) -> LiveId;

	/// Current children, in host order.
	fn live_children(&self) -> Vec<Rc<Self>>
	where
		Self: Sized;

	/// Point read of a single property, used for staleness checks.
	fn read_property(&self, key: &PropertyKey) -> Option<PropertyValue>;
}

/// Weak, nullable handle to a live node.
pub struct LiveHandle<N>(Option<Weak<N>>);

impl<N> LiveHandle<N> {
	pub fn new(node: &Rc<N>) -> Self {
		Self(Some(Rc::downgrade(node)))
	}

	/// A handle that never resolves. Synthetic nodes carry one.
	pub const fn detached() -> Self {
		Self(None)
	}

	pub fn is_detached(&self) -> bool {
		self.0.is_none()
	}

	/// Upgrades to the live node, or `None` if the host has dropped it.
	pub fn resolve(&self) -> Option<Rc<N>> {
		self.0.as_ref().and_then(Weak::upgrade)
	}

	/// Returns `true` if the node is still alive, without upgrading.
	pub fn is_alive(&self) -> bool {
		self.0.as_ref().is_some_and(|weak| weak.strong_count() > 0)
	}
}

impl<N> Clone for LiveHandle<N> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<N> Default for LiveHandle<N> {
	fn default() -> Self {
		Self::detached()
	}
}

impl<N> From<&Rc<N>> for LiveHandle<N> {
	fn from(node: &Rc<N>) -> Self {
		Self::new(node)
	}
}

impl<N> fmt::Debug for LiveHandle<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = match &self.0 {
			None => "detached",
			Some(weak) if weak.strong_count() > 0 => "alive",
			Some(_) => "gone",
		};
		f.debug_tuple("LiveHandle").field(&state).finish()
	}
}
