//! Pairwise relationship classification.
//!
//! The classifier partitions a constraint's bindings into the analysed
//! node's own ("mine") and foreign ("theirs"), drops anything touching a
//! non-inspectable node, then picks the first matching kind:
//!
//! | theirs | mine      | multiplier | kind                          |
//! |--------|-----------|------------|-------------------------------|
//! | 0      | non-empty | `!= 1`     | [`RelationshipKind::AspectRatio`]  |
//! | 0      | non-empty | `== 1`     | [`RelationshipKind::Constant`]     |
//! | 1      | any       | `!= 1`     | [`RelationshipKind::Proportional`] |
//! | 1      | any       | `== 1`     | [`RelationshipKind::Relative`]     |
//! | 2      | -         | -          | none                          |
//!
//! Arity is the primary discriminator; the multiplier only splits each arity.

use smallvec::SmallVec;
use tracing::{debug, trace};
use umbra_mirror::NodeIdentity;

use crate::binding::{Binding, Ownership};
use crate::kind::{Relation, Relationship, RelationshipKind};

/// Classifier input: one or two bindings and how they relate.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
	pub first: Binding,
	pub second: Option<Binding>,
	pub relation: Relation,
	pub multiplier: f64,
	pub constant: f64,
}

impl Constraint {
	/// A single-binding constraint, `first relation constant`.
	pub fn constant(first: Binding, relation: Relation, constant: f64) -> Self {
		Self {
			first,
			second: None,
			relation,
			multiplier: 1.0,
			constant,
		}
	}

	/// A two-binding constraint, `first = second * multiplier`.
	pub fn between(first: Binding, second: Binding, multiplier: f64) -> Self {
		Self {
			first,
			second: Some(second),
			relation: Relation::Equal,
			multiplier,
			constant: 0.0,
		}
	}

	/// Present bindings, first binding first.
	pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
		std::iter::once(&self.first).chain(self.second.as_ref())
	}

	fn is_scaled(&self) -> bool {
		// Exact: only a literal 1 means "unscaled".
		self.multiplier != 1.0
	}
}

type Side<'a> = SmallVec<[&'a Binding; 2]>;

/// Classifies `constraint` as seen from the node `self_id`.
///
/// Returns `None` when the constraint touches a non-inspectable node, when
/// a constant would have no attribute name to show, or when it binds two
/// foreign attributes.
pub fn classify(constraint: &Constraint, self_id: &NodeIdentity) -> Option<RelationshipKind> {
	if let Some(hidden) = constraint.bindings().find(|b| !b.item.inspectable) {
		trace!(identity = %hidden.item.identity, "relations.classify.excluded");
		return None;
	}

	let (mine, theirs): (Side<'_>, Side<'_>) = constraint
		.bindings()
		.partition(|b| b.ownership(self_id) == Ownership::Mine);
	if mine.len() > 1 {
		debug!(identity = %self_id, count = mine.len(), "relations.classify.multiple_mine");
	}
	let from = mine.first().map(|b| b.attribute);

	match (theirs.as_slice(), from) {
		([], Some(_)) if constraint.is_scaled() => Some(RelationshipKind::AspectRatio {
			multiplier: constraint.multiplier,
		}),
		([], Some(attribute)) => {
			attribute.display_name()?;
			Some(RelationshipKind::Constant {
				attribute,
				relation: constraint.relation,
				value: constraint.constant,
			})
		}
		([their], from) if constraint.is_scaled() => Some(RelationshipKind::Proportional {
			from,
			to: their.item.display_name.clone(),
		}),
		([their], from) => Some(RelationshipKind::Relative {
			from,
			to: their.item.display_name.clone(),
		}),
		_ => None,
	}
}

/// Classifies every constraint, keeping input order and skipping the
/// unclassifiable ones.
pub fn classify_all<'a>(
	constraints: impl IntoIterator<Item = &'a Constraint>,
	self_id: &NodeIdentity,
) -> Vec<Relationship> {
	constraints
		.into_iter()
		.filter_map(|constraint| {
			let kind = classify(constraint, self_id)?;
			let anchors = constraint.bindings().map(|b| b.anchor).collect();
			Some(Relationship { kind, anchors })
		})
		.collect()
}
