//! Error types for store operations.

use thiserror::Error;

use crate::id::StoryId;

/// Errors raised by [`StoryStore`](crate::StoryStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
	/// A lookup or mutation referenced an id that is not registered.
	#[error("unknown story: {id}")]
	UnknownStory {
		/// The id looked up.
		id: StoryId,
	},

	/// A story with this id exists and the duplicate policy is `reject`.
	#[error("story already registered: {id}")]
	DuplicateStory {
		/// The id registered twice.
		id: StoryId,
	},

	/// `options.storySort` is neither a comparator nor a `{method, order}` object.
	#[error("invalid storySort configuration: {0}")]
	InvalidSortConfig(String),

	/// `argTypes` does not map argument names to objects.
	#[error("invalid argTypes for {id}: {reason}")]
	InvalidArgTypes {
		/// Story being registered.
		id: StoryId,
		/// Parse failure.
		reason: String,
	},

	/// A channel was attached already; channels are never swapped.
	#[error("a channel is already attached")]
	ChannelAlreadyAttached,

	/// The store configuration could not be parsed.
	#[error("config parse error: {0}")]
	Config(#[from] toml::de::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
