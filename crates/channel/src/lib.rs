//! Channel boundary between a story store and its remote peer.
//!
//! This crate defines the transport-agnostic side of the pipe a store talks
//! through:
//! * `Channel`: send/subscribe surface a store attaches to
//! * `Message`: everything that travels over the pipe
//! * `LoopbackChannel`: an in-memory connected pair for hosts and tests

#![warn(missing_docs)]

use std::sync::Arc;

pub mod error;
pub mod loopback;
pub mod message;

pub use error::{ChannelError, Result};
pub use loopback::LoopbackChannel;
pub use message::{Message, MessageKind, Selection, StorySummary};

/// Callback invoked for each inbound message of a subscribed kind.
pub type MessageHandler = Arc<dyn Fn(&Message) + Send + Sync>;

/// Reliable, ordered, bidirectional message pipe to a remote peer.
///
/// Implementations own the wire encoding. Delivery of `send` on the local end
/// is expected to complete before `send` returns only for in-process
/// transports; a store never relies on a reply.
pub trait Channel: Send + Sync {
	/// Sends a message to the peer.
	fn send(&self, message: Message);

	/// Registers a handler for messages of `kind` arriving from the peer.
	///
	/// Handlers run in registration order.
	fn on_message(&self, kind: MessageKind, handler: MessageHandler);

	/// Returns true while the underlying transport can deliver messages.
	fn is_attached(&self) -> bool {
		true
	}
}
