//! In-memory live tree for tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::live::{LiveId, LiveNode};
use crate::snapshot::{Extractor, NodeSnapshot, PropertyKey, PropertyValue};

/// Host node whose properties and children tests mutate directly.
#[derive(Debug)]
pub(crate) struct FakeNode {
	id: LiveId,
	class_name: String,
	properties: RefCell<BTreeMap<PropertyKey, PropertyValue>>,
	children: RefCell<Vec<Rc<FakeNode>>>,
}

impl FakeNode {
	pub(crate) fn new(id: u64, class_name: &str) -> Rc<Self> {
		Rc::new(Self {
			id: LiveId(id),
			class_name: class_name.to_owned(),
			properties: RefCell::default(),
			children: RefCell::default(),
		})
	}

	pub(crate) fn with_property(self: Rc<Self>, key: &str, value: impl Into<PropertyValue>) -> Rc<Self> {
		self.set_property(key, value);
		self
	}

	pub(crate) fn set_property(&self, key: &str, value: impl Into<PropertyValue>) {
		self.properties.borrow_mut().insert(key.into(), value.into());
	}

	/// Appends `child` and hands it back.
	pub(crate) fn add_child(&self, child: Rc<Self>) -> Rc<Self> {
		self.children.borrow_mut().push(Rc::clone(&child));
		child
	}

	/// Detaches and returns the child with `id`, if present.
	pub(crate) fn take_child(&self, id: u64) -> Option<Rc<Self>> {
		let mut children = self.children.borrow_mut();
		let at = children.iter().position(|c| c.id == LiveId(id))?;
		Some(children.remove(at))
	}
}

impl LiveNode for FakeNode {
	fn live_id(&self) -> LiveId {
		self.id
	}

	fn live_children(&self) -> Vec<Rc<Self>> {
		self.children.borrow().clone()
	}

	fn read_property(&self, key: &PropertyKey) -> Option<PropertyValue> {
		self.properties.borrow().get(key).cloned()
	}
}

/// Extractor copying class name and every property.
pub(crate) fn extractor() -> Extractor<FakeNode> {
	Rc::new(|node: &FakeNode| {
		let mut snapshot = NodeSnapshot::new(node.class_name.clone());
		snapshot.properties = node.properties.borrow().clone();
		snapshot
	})
}
