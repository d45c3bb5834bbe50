//! Identifier types for mirror nodes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::live::LiveId;

/// Generational key of a node inside a [`crate::MirrorTree`].
///
/// The generation is bumped whenever the slot is freed, so a `NodeId` kept
/// across a removal never resolves to the node that later reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	pub(crate) idx: u32,
	pub(crate) generation: u32,
}

impl NodeId {
	pub(crate) fn new(idx: usize, generation: u32) -> Self {
		Self {
			idx: idx as u32,
			generation,
		}
	}

	pub(crate) fn slot(self) -> usize {
		self.idx as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}v{}", self.idx, self.generation)
	}
}

/// Process-unique identity of a mirror node, fixed at creation.
///
/// Nodes mirroring a live node take the live node's identity. Synthetic nodes
/// and nodes whose live handle was already gone get a fresh local serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeIdentity {
	Live(LiveId),
	Local(u64),
}

static NEXT_LOCAL: AtomicU64 = AtomicU64::new(1);

impl NodeIdentity {
	/// Allocates a fresh local identity.
	pub fn next_local() -> Self {
		Self::Local(NEXT_LOCAL.fetch_add(1, Ordering::Relaxed))
	}

	pub fn live_id(self) -> Option<LiveId> {
		match self {
			Self::Live(id) => Some(id),
			Self::Local(_) => None,
		}
	}
}

impl fmt::Display for NodeIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Live(id) => id.fmt(f),
			Self::Local(serial) => write!(f, "local#{serial}"),
		}
	}
}

impl From<LiveId> for NodeIdentity {
	fn from(id: LiveId) -> Self {
		Self::Live(id)
	}
}
