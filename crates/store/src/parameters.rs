//! Scoped story configuration.
//!
//! Parameters are a JSON object plus an optional typed sort slot. The slot
//! exists because a custom comparator is a closure and cannot live in JSON;
//! structured sort configuration may instead be given as JSON under
//! `options.storySort`.

use std::fmt;

use serde_json::{Map, Value};

use crate::Result;
use crate::sort::StorySort;

/// Top-level key holding presentation options.
pub const OPTIONS_KEY: &str = "options";
/// Key under [`OPTIONS_KEY`] holding structured sort configuration.
pub const STORY_SORT_KEY: &str = "storySort";
/// Top-level key holding argument type declarations.
pub const ARG_TYPES_KEY: &str = "argTypes";

/// Configuration attached to a global, kind or story scope.
#[derive(Clone, Default)]
pub struct Parameters {
	values: Map<String, Value>,
	story_sort: Option<StorySort>,
}

impl Parameters {
	/// Empty parameters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`Parameters::set`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(key, value);
		self
	}

	/// Sets the typed sort slot, which takes precedence over `options.storySort`
	/// in the same scope.
	pub fn with_story_sort(mut self, sort: StorySort) -> Self {
		self.story_sort = Some(sort);
		self
	}

	/// Sets a top-level key.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(key.into(), value.into());
	}

	/// Value of a top-level key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// All JSON values.
	pub fn values(&self) -> &Map<String, Value> {
		&self.values
	}

	/// The typed sort slot.
	pub fn story_sort(&self) -> Option<&StorySort> {
		self.story_sort.as_ref()
	}

	/// Returns true when no key and no sort slot is set.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty() && self.story_sort.is_none()
	}

	/// Shallow right-biased merge: every top-level key of `other` replaces the
	/// key of the same name here. The sort slot is replaced only when `other`
	/// sets one.
	pub fn extend_from(&mut self, other: &Parameters) {
		for (key, value) in &other.values {
			self.values.insert(key.clone(), value.clone());
		}
		if let Some(sort) = &other.story_sort {
			self.story_sort = Some(sort.clone());
		}
	}

	/// Resolves the effective sort policy of this scope.
	///
	/// Returns `Ok(None)` when neither the typed slot nor `options.storySort`
	/// is set, and [`StoreError::InvalidSortConfig`] when the JSON form is
	/// malformed.
	///
	/// [`StoreError::InvalidSortConfig`]: crate::StoreError::InvalidSortConfig
	pub fn sort_policy(&self) -> Result<Option<StorySort>> {
		if let Some(sort) = &self.story_sort {
			return Ok(Some(sort.clone()));
		}
		match self
			.values
			.get(OPTIONS_KEY)
			.and_then(|options| options.get(STORY_SORT_KEY))
		{
			None | Some(Value::Null) => Ok(None),
			Some(config) => StorySort::from_value(config).map(Some),
		}
	}
}

impl From<Map<String, Value>> for Parameters {
	fn from(values: Map<String, Value>) -> Self {
		Self {
			values,
			story_sort: None,
		}
	}
}

impl fmt::Debug for Parameters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Parameters")
			.field("values", &self.values)
			.field("story_sort", &self.story_sort)
			.finish()
	}
}
