//! Store configuration.
//!
//! ```toml
//! duplicate-policy = "reject"
//!
//! [story-sort]
//! method = "alphabetical"
//! order = ["Intro", "Components", ["Button", "*"], "*"]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;
use crate::metadata::Metadata;
use crate::parameters::{OPTIONS_KEY, Parameters, STORY_SORT_KEY};
use crate::sort::StorySort;

/// What [`StoryStore::add`](crate::StoryStore::add) does with an id that is
/// already registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Keep the existing record and ignore the new one.
	FirstWins,
	/// Replace the existing record in place.
	#[default]
	LastWins,
	/// Fail with [`StoreError::DuplicateStory`](crate::StoreError::DuplicateStory).
	Reject,
}

/// Settings a store is built with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
	/// Handling of ids registered twice.
	#[serde(default)]
	pub duplicate_policy: DuplicatePolicy,
	/// Default structured sort, seeded into global parameters as
	/// `options.storySort`.
	#[serde(default)]
	pub story_sort: Option<Value>,
}

impl StoreConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml(src: &str) -> Result<Self> {
		let config: Self = toml::from_str(src)?;
		if let Some(sort) = &config.story_sort {
			StorySort::from_value(sort)?;
		}
		Ok(config)
	}

	/// Global scope a store built from this config starts with.
	pub(crate) fn seed_metadata(&self) -> Metadata {
		let mut parameters = Parameters::new();
		if let Some(sort) = &self.story_sort {
			let mut options = Map::new();
			options.insert(STORY_SORT_KEY.to_string(), sort.clone());
			parameters.set(OPTIONS_KEY, options);
		}
		Metadata::new().with_parameters(parameters)
	}
}
