//! Presentation ordering of the story catalogue.
//!
//! Three policies are available:
//!
//! - [`StorySort::Custom`]: a comparator applied as a stable sort over the flat
//!   list. Entries comparing equal keep insertion order.
//! - [`StorySort::Alphabetical`]: stories are grouped by their `/`-delimited
//!   kind path. At every level a group's own stories come first, then its child
//!   groups: the ones named in the explicit [`SortOrder`] in that order, then
//!   the rest (at the wildcard position if there is one) ordered by
//!   [`natural_cmp`](natural::natural_cmp).
//! - [`StorySort::Configure`]: same grouping, but unlisted groups keep their
//!   first-appearance order.
//!
//! Stories inside one kind are never reordered by the hierarchical policies.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::store::StoryView;
use crate::{Result, StoreError};

mod natural;
mod order;
#[cfg(test)]
mod tests;

pub use order::{OrderEntry, SortOrder, WILDCARD};

/// Separator between kind path segments.
pub const KIND_SEPARATOR: char = '/';

/// Comparator for [`StorySort::Custom`].
pub type Comparator = Arc<dyn Fn(&StoryView, &StoryView) -> Ordering + Send + Sync>;

/// Sort policy for [`StoryStore::extract`](crate::StoryStore::extract).
#[derive(Clone)]
pub enum StorySort {
	/// Stable sort of the flat list by a comparator.
	Custom(Comparator),
	/// Kind-path grouping; unlisted groups in natural order.
	Alphabetical(SortOrder),
	/// Kind-path grouping; unlisted groups in first-appearance order.
	Configure(SortOrder),
}

impl StorySort {
	/// Wraps a comparator closure.
	pub fn custom(f: impl Fn(&StoryView, &StoryView) -> Ordering + Send + Sync + 'static) -> Self {
		Self::Custom(Arc::new(f))
	}

	/// Alphabetical policy without an explicit order.
	pub fn alphabetical() -> Self {
		Self::Alphabetical(SortOrder::default())
	}

	/// Configure policy without an explicit order.
	pub fn configure() -> Self {
		Self::Configure(SortOrder::default())
	}

	/// Parses the structured `{ method, order }` form.
	///
	/// A missing `method` means `configure`. Unknown keys such as `locales` are
	/// ignored.
	pub fn from_value(value: &Value) -> Result<Self> {
		let Value::Object(config) = value else {
			return Err(invalid(format!("expected an object, got {value}")));
		};
		let order = match config.get("order") {
			None | Some(Value::Null) => SortOrder::default(),
			Some(order) => SortOrder::from_value(order).map_err(invalid)?,
		};
		match config.get("method") {
			None | Some(Value::Null) => Ok(Self::Configure(order)),
			Some(Value::String(method)) => match method.as_str() {
				"alphabetical" => Ok(Self::Alphabetical(order)),
				"configure" => Ok(Self::Configure(order)),
				other => Err(invalid(format!("unknown method {other:?}"))),
			},
			Some(other) => Err(invalid(format!("`method` must be a string, got {other}"))),
		}
	}

	/// Reorders `stories`, which must be in insertion order.
	pub fn apply(&self, stories: Vec<StoryView>) -> Vec<StoryView> {
		match self {
			Self::Custom(cmp) => {
				let mut stories = stories;
				stories.sort_by(|a, b| cmp(a, b));
				stories
			}
			Self::Alphabetical(order) => grouped(stories, order, true),
			Self::Configure(order) => grouped(stories, order, false),
		}
	}
}

impl fmt::Debug for StorySort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Custom(_) => f.write_str("Custom(<comparator>)"),
			Self::Alphabetical(order) => f.debug_tuple("Alphabetical").field(order).finish(),
			Self::Configure(order) => f.debug_tuple("Configure").field(order).finish(),
		}
	}
}

fn invalid(reason: String) -> StoreError {
	StoreError::InvalidSortConfig(reason)
}

/// Orders `stories` by `policy`; `None` keeps insertion order.
pub fn sort_stories(stories: Vec<StoryView>, policy: Option<&StorySort>) -> Vec<StoryView> {
	match policy {
		Some(policy) => policy.apply(stories),
		None => stories,
	}
}

/// Splits a kind into trimmed path segments.
pub fn kind_segments(kind: &str) -> impl Iterator<Item = &str> {
	kind.trim().split(KIND_SEPARATOR).map(str::trim)
}

/// Returns true when `kind` equals `prefix` or is nested under it.
pub fn kind_has_prefix(kind: &str, prefix: &str) -> bool {
	let mut segments = kind_segments(kind);
	kind_segments(prefix).all(|expected| segments.next() == Some(expected))
}

#[derive(Default)]
struct Group<'a> {
	stories: Vec<usize>,
	children: IndexMap<&'a str, Group<'a>>,
}

impl<'a> Group<'a> {
	fn flatten(&self, order: &SortOrder, alphabetical: bool, out: &mut Vec<usize>) {
		out.extend_from_slice(&self.stories);

		let unlisted = order.unlisted_rank();
		let mut children: Vec<(&'a str, &Group<'a>)> =
			self.children.iter().map(|(name, group)| (*name, group)).collect();
		children.sort_by(|(a, _), (b, _)| {
			let (pa, pb) = (order.position(a), order.position(b));
			let rank = |p: Option<usize>| p.unwrap_or(unlisted);
			rank(pa).cmp(&rank(pb)).then_with(|| match (pa, pb) {
				(None, None) if alphabetical => natural::natural_cmp(a, b),
				_ => Ordering::Equal,
			})
		});

		for (name, child) in children {
			child.flatten(order.children_of(name), alphabetical, out);
		}
	}
}

fn grouped(stories: Vec<StoryView>, order: &SortOrder, alphabetical: bool) -> Vec<StoryView> {
	let positions = {
		let mut root = Group::default();
		for (index, story) in stories.iter().enumerate() {
			let mut node = &mut root;
			for segment in kind_segments(&story.kind) {
				node = node.children.entry(segment).or_default();
			}
			node.stories.push(index);
		}
		let mut positions = Vec::with_capacity(stories.len());
		root.flatten(order, alphabetical, &mut positions);
		positions
	};

	let mut slots: Vec<Option<StoryView>> = stories.into_iter().map(Some).collect();
	positions
		.into_iter()
		.filter_map(|index| slots[index].take())
		.collect()
}
