//! One end of a pairwise relationship.

use std::fmt;

use serde::Serialize;
use umbra_mirror::{MirrorNode, NodeIdentity};

/// Geometric attribute a binding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
	Left,
	Right,
	Top,
	Bottom,
	Leading,
	Trailing,
	Width,
	Height,
	CenterX,
	CenterY,
	FirstBaseline,
	LastBaseline,
	/// Placeholder for a binding that does not name an attribute.
	NotAnAttribute,
}

impl AttributeKind {
	/// Name shown to users, or `None` for [`AttributeKind::NotAnAttribute`].
	pub fn display_name(self) -> Option<&'static str> {
		Some(match self {
			Self::Left => "Left",
			Self::Right => "Right",
			Self::Top => "Top",
			Self::Bottom => "Bottom",
			Self::Leading => "Leading",
			Self::Trailing => "Trailing",
			Self::Width => "Width",
			Self::Height => "Height",
			Self::CenterX => "Center X",
			Self::CenterY => "Center Y",
			Self::FirstBaseline => "First Baseline",
			Self::LastBaseline => "Last Baseline",
			Self::NotAnAttribute => return None,
		})
	}
}

impl fmt::Display for AttributeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.display_name().unwrap_or("<none>"))
	}
}

/// Opaque handle to the anchor a binding attaches through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnchorRef(pub u64);

/// The node a binding points at, as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
	pub identity: NodeIdentity,
	pub display_name: String,
	/// `false` excludes every relationship touching this node.
	pub inspectable: bool,
}

impl NodeRef {
	pub fn new(identity: NodeIdentity, display_name: impl Into<String>) -> Self {
		Self {
			identity,
			display_name: display_name.into(),
			inspectable: true,
		}
	}

	/// Reference built from a mirrored node's cached facts.
	///
	/// The name comes from the first snapshot, inspectability from the latest.
	pub fn of<N>(node: &MirrorNode<N>) -> Self {
		Self {
			identity: node.identity(),
			display_name: node.first_snapshot().display_name().to_owned(),
			inspectable: node.cached().inspectable,
		}
	}

	pub fn opaque(mut self) -> Self {
		self.inspectable = false;
		self
	}
}

/// Whether a binding belongs to the node under analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
	Mine,
	Theirs,
}

/// A (node, attribute, anchor) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
	pub item: NodeRef,
	pub attribute: AttributeKind,
	pub anchor: AnchorRef,
}

impl Binding {
	pub fn new(item: NodeRef, attribute: AttributeKind, anchor: AnchorRef) -> Self {
		Self { item, attribute, anchor }
	}

	pub fn ownership(&self, self_id: &NodeIdentity) -> Ownership {
		if self.item.identity == *self_id {
			Ownership::Mine
		} else {
			Ownership::Theirs
		}
	}
}
