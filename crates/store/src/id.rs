//! Story identifier derivation.
//!
//! An id is the sanitized kind and the sanitized name joined by
//! [`ID_SEPARATOR`]. Sanitizing lowercases letters and collapses every run of
//! non-alphanumeric characters (including the `/` kind separator) into a single
//! `-`, so `("Widgets/Button", "With Icon")` becomes
//! `widgets-button--with-icon`.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the kind and name parts of an id.
pub const ID_SEPARATOR: &str = "--";

/// Unique story identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(Box<str>);

impl StoryId {
	/// Wraps an already-derived id without re-sanitizing it.
	pub fn from_raw(id: impl Into<Box<str>>) -> Self {
		Self(id.into())
	}

	/// The id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for StoryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for StoryId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for StoryId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<StoryId> for String {
	fn from(id: StoryId) -> Self {
		id.0.into()
	}
}

/// Lowercases `part` and collapses non-alphanumeric runs into single dashes.
///
/// Leading and trailing separators are dropped.
pub fn sanitize(part: &str) -> String {
	let mut out = String::with_capacity(part.len());
	let mut pending_dash = false;
	for c in part.chars() {
		if c.is_alphanumeric() {
			if pending_dash && !out.is_empty() {
				out.push('-');
			}
			pending_dash = false;
			out.extend(c.to_lowercase());
		} else {
			pending_dash = true;
		}
	}
	out
}

/// Derives the id of the story `name` within `kind`.
pub fn story_id(kind: &str, name: &str) -> StoryId {
	StoryId(format!("{}{ID_SEPARATOR}{}", sanitize(kind), sanitize(name)).into())
}
