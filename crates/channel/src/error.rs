//! Error types for the channel boundary.

use thiserror::Error;

/// Errors raised while encoding or decoding channel messages.
#[derive(Debug, Error)]
pub enum ChannelError {
	/// The payload was not a well-formed message.
	#[error("failed to decode message: {0}")]
	Decode(#[source] serde_json::Error),

	/// The message could not be serialized.
	#[error("failed to encode message: {0}")]
	Encode(#[source] serde_json::Error),
}

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
