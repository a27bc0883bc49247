//! Explicit group order for the hierarchical sort policies.
//!
//! The JSON form is a flat array of group names where an array immediately
//! following a name is the order of that group's children:
//!
//! ```json
//! ["Intro", "Components", ["Button", "*", "Form"], "*"]
//! ```
//!
//! The `*` entry marks where groups not named in the list are placed. Without
//! it they follow every named group. An array after `*` orders the children
//! of every unlisted group.

use serde_json::Value;

/// Name of the entry standing for every group not listed explicitly.
pub const WILDCARD: &str = "*";

static EMPTY: SortOrder = SortOrder(Vec::new());

/// One named group and the order of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
	/// Group name, or [`WILDCARD`].
	pub name: String,
	/// Order of the group's children.
	pub children: SortOrder,
}

impl OrderEntry {
	/// Entry without a child order.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			children: SortOrder::default(),
		}
	}

	/// Sets the child order.
	pub fn with_children(mut self, children: SortOrder) -> Self {
		self.children = children;
		self
	}
}

/// Explicit order of the groups at one level of the kind hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder(Vec<OrderEntry>);

impl SortOrder {
	/// Order from prepared entries.
	pub fn new(entries: Vec<OrderEntry>) -> Self {
		Self(entries)
	}

	/// Builds a single-level order from plain names.
	pub fn from_names<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(names.into_iter().map(OrderEntry::new).collect())
	}

	/// Parses the flat JSON array form.
	pub fn from_value(value: &Value) -> Result<Self, String> {
		let Value::Array(items) = value else {
			return Err(format!("`order` must be an array, got {value}"));
		};
		let mut entries: Vec<OrderEntry> = Vec::with_capacity(items.len());
		let mut last_was_name = false;
		for item in items {
			match item {
				Value::String(name) => {
					entries.push(OrderEntry::new(name.as_str()));
					last_was_name = true;
				}
				Value::Array(_) => {
					let parent = match entries.last_mut() {
						Some(parent) if last_was_name => parent,
						_ => return Err("nested order must follow a group name".to_string()),
					};
					parent.children = Self::from_value(item)?;
					last_was_name = false;
				}
				other => return Err(format!("`order` entries must be strings or arrays, got {other}")),
			}
		}
		Ok(Self(entries))
	}

	/// Entries in order.
	pub fn entries(&self) -> &[OrderEntry] {
		&self.0
	}

	/// Returns true without entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Position of `name` among the entries, ignoring the wildcard.
	pub(crate) fn position(&self, name: &str) -> Option<usize> {
		if name == WILDCARD {
			return None;
		}
		self.0.iter().position(|entry| entry.name == name)
	}

	fn wildcard(&self) -> Option<usize> {
		self.0.iter().position(|entry| entry.name == WILDCARD)
	}

	/// Rank shared by every group not listed explicitly.
	pub(crate) fn unlisted_rank(&self) -> usize {
		self.wildcard().unwrap_or(self.0.len())
	}

	/// Order for the children of `name`.
	///
	/// Unlisted groups use the nested order given after `*`, if any.
	pub(crate) fn children_of(&self, name: &str) -> &SortOrder {
		self.position(name)
			.or_else(|| self.wildcard())
			.map_or(&EMPTY, |i| &self.0[i].children)
	}
}
