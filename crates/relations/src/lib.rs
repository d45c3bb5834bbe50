//! Relationship classification between anchored node bindings.
//!
//! A [`Constraint`] pairs one or two [`Binding`]s with a relation, a
//! multiplier and a constant. [`classify`] decides, from the point of view
//! of one node, which of a closed set of [`RelationshipKind`]s it describes.

/// Binding inputs: node references, attributes and anchors.
pub mod binding;
/// The classifier.
pub mod classify;
/// Classifier outputs.
pub mod kind;

pub use binding::{AnchorRef, AttributeKind, Binding, NodeRef, Ownership};
pub use classify::{Constraint, classify, classify_all};
pub use kind::{Relation, Relationship, RelationshipKind};
