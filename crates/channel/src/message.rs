//! Messages exchanged between a story store and its peer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ChannelError, Result};

/// The currently active story and the view it is shown in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
	/// Identifier of the selected story.
	pub story_id: String,
	/// View the story is shown in (for example `story` or `docs`).
	pub view_mode: String,
}

impl Selection {
	/// Creates a selection for `story_id` in `view_mode`.
	pub fn new(story_id: impl Into<String>, view_mode: impl Into<String>) -> Self {
		Self {
			story_id: story_id.into(),
			view_mode: view_mode.into(),
		}
	}
}

/// Public projection of one catalogue entry as published to the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySummary {
	/// Story identifier.
	pub id: String,
	/// `/`-delimited kind path.
	pub kind: String,
	/// Story name within its kind.
	pub name: String,
	/// Merged parameters.
	pub parameters: Map<String, Value>,
}

/// Discriminant of [`Message`], used to subscribe to one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
	/// See [`Message::SelectionChanged`].
	SelectionChanged,
	/// See [`Message::ArgsChanged`].
	ArgsChanged,
	/// See [`Message::UpdateArgs`].
	UpdateArgs,
	/// See [`Message::SetCurrentStory`].
	SetCurrentStory,
	/// See [`Message::SetStories`].
	SetStories,
}

/// A message travelling over a [`Channel`](crate::Channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Message {
	/// Outbound: the current selection changed.
	SelectionChanged(Selection),
	/// Outbound: a story's args changed; carries the full resulting mapping.
	ArgsChanged {
		/// Story whose args changed.
		story_id: String,
		/// Complete args after the change.
		args: Map<String, Value>,
	},
	/// Inbound: the peer requests a partial args update.
	UpdateArgs {
		/// Story to update.
		story_id: String,
		/// Keys to overwrite or add.
		updated_args: Map<String, Value>,
	},
	/// Inbound: the peer requests a new selection.
	SetCurrentStory(Selection),
	/// Outbound: the ordered catalogue after configuration finished.
	SetStories {
		/// Stories in presentation order.
		stories: Vec<StorySummary>,
	},
}

impl Message {
	/// Returns the kind used for handler lookup.
	pub fn kind(&self) -> MessageKind {
		match self {
			Self::SelectionChanged(_) => MessageKind::SelectionChanged,
			Self::ArgsChanged { .. } => MessageKind::ArgsChanged,
			Self::UpdateArgs { .. } => MessageKind::UpdateArgs,
			Self::SetCurrentStory(_) => MessageKind::SetCurrentStory,
			Self::SetStories { .. } => MessageKind::SetStories,
		}
	}

	/// Encodes the message as JSON text.
	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string(self).map_err(ChannelError::Encode)
	}

	/// Decodes a message from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(ChannelError::Decode)
	}
}
