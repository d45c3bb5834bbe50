//! Point-in-time captures of a live node's derived properties.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Name of a cached property. The mirror attaches no meaning to it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey(String);

impl PropertyKey {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for PropertyKey {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl fmt::Display for PropertyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Observable value of a live property.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
	Rect {
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	},
	/// The property is not present on the node.
	#[default]
	Missing,
}

impl From<bool> for PropertyValue {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<i64> for PropertyValue {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<f64> for PropertyValue {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<&str> for PropertyValue {
	fn from(v: &str) -> Self {
		Self::Text(v.to_owned())
	}
}

impl From<String> for PropertyValue {
	fn from(v: String) -> Self {
		Self::Text(v)
	}
}

/// A structural issue attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Issue {
	/// The live node could no longer be resolved.
	LostConnection,
	/// Host-reported issue.
	Custom(String),
}

impl fmt::Display for Issue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Issue::LostConnection => f.write_str("lost connection"),
			Issue::Custom(msg) => f.write_str(msg),
		}
	}
}

/// Ordered, duplicate-free set of issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSet(SmallVec<[Issue; 2]>);

impl IssueSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `issue`, returning `false` if it was already present.
	pub fn insert(&mut self, issue: Issue) -> bool {
		match self.0.binary_search(&issue) {
			Ok(_) => false,
			Err(at) => {
				self.0.insert(at, issue);
				true
			}
		}
	}

	pub fn contains(&self, issue: &Issue) -> bool {
		self.0.binary_search(issue).is_ok()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Issue> {
		self.0.iter()
	}
}

impl FromIterator<Issue> for IssueSet {
	fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
		let mut set = Self::new();
		for issue in iter {
			set.insert(issue);
		}
		set
	}
}

/// Immutable capture of a node's identity facts and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
	/// Host class or type name.
	pub class_name: String,
	/// Stable identifiers (accessibility ids, tags, names), most specific first.
	pub identifiers: Vec<String>,
	/// Whether consumers may inspect this node's relationships.
	pub inspectable: bool,
	pub properties: BTreeMap<PropertyKey, PropertyValue>,
	pub issues: IssueSet,
}

impl NodeSnapshot {
	pub fn new(class_name: impl Into<String>) -> Self {
		Self {
			class_name: class_name.into(),
			identifiers: Vec::new(),
			inspectable: true,
			properties: BTreeMap::new(),
			issues: IssueSet::new(),
		}
	}

	/// Defaults for a node whose live handle was gone before it could be read.
	pub fn disconnected() -> Self {
		let mut snapshot = Self::new("<disconnected>");
		snapshot.inspectable = false;
		snapshot.issues.insert(Issue::LostConnection);
		snapshot
	}

	pub fn with_identifier(mut self, id: impl Into<String>) -> Self {
		self.identifiers.push(id.into());
		self
	}

	pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<PropertyValue>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	/// Cached value of `key`, or [`PropertyValue::Missing`].
	pub fn property(&self, key: &PropertyKey) -> &PropertyValue {
		static MISSING: PropertyValue = PropertyValue::Missing;
		self.properties.get(key).unwrap_or(&MISSING)
	}

	/// Name shown to users: the most specific identifier, else the class name.
	pub fn display_name(&self) -> &str {
		self.identifiers.first().map_or(self.class_name.as_str(), String::as_str)
	}
}

/// Derives a full snapshot from a live node. Supplied by the host.
pub type Extractor<N> = Rc<dyn Fn(&N) -> NodeSnapshot>;
