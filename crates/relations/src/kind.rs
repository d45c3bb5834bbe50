//! Closed set of relationship kinds and the records built from them.

use std::fmt;

use serde::Serialize;

use crate::binding::{AnchorRef, AttributeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
	LessThanOrEqual,
	Equal,
	GreaterThanOrEqual,
}

impl Relation {
	pub fn symbol(self) -> &'static str {
		match self {
			Self::LessThanOrEqual => "≤",
			Self::Equal => "=",
			Self::GreaterThanOrEqual => "≥",
		}
	}
}

impl fmt::Display for Relation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

/// What a classified constraint means from one node's point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationshipKind {
	/// Two of the node's own attributes scaled against each other.
	AspectRatio { multiplier: f64 },
	/// One of the node's own attributes pinned to a value.
	Constant {
		attribute: AttributeKind,
		relation: Relation,
		value: f64,
	},
	/// An attribute tied one-to-one to another node.
	Relative {
		from: Option<AttributeKind>,
		to: String,
	},
	/// An attribute tied to another node through a multiplier.
	Proportional {
		from: Option<AttributeKind>,
		to: String,
	},
}

impl fmt::Display for RelationshipKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name_of = |from: &Option<AttributeKind>| from.and_then(AttributeKind::display_name);
		match self {
			Self::AspectRatio { multiplier } => write!(f, "Aspect Ratio {multiplier}"),
			Self::Constant {
				attribute,
				relation,
				value,
			} => write!(f, "{attribute} {relation} {value}"),
			Self::Relative { from, to } => match name_of(from) {
				Some(name) => write!(f, "{name} relative to {to}"),
				None => write!(f, "Relative to {to}"),
			},
			Self::Proportional { from, to } => match name_of(from) {
				Some(name) => write!(f, "{name} proportional to {to}"),
				None => write!(f, "Proportional to {to}"),
			},
		}
	}
}

/// A classified relationship together with the anchors it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
	#[serde(flatten)]
	pub kind: RelationshipKind,
	/// Anchors of the bindings involved, first binding first.
	pub anchors: Vec<AnchorRef>,
}

impl fmt::Display for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.kind, f)
	}
}
