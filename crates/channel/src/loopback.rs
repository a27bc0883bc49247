//! In-memory channel pair.
//!
//! Both ends live in the same process. A message sent on one end is delivered
//! synchronously to the handlers registered on the other end before `send`
//! returns, which keeps ordering trivially reliable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::{Channel, Message, MessageHandler, MessageKind};

#[derive(Default)]
struct Inbox {
	handlers: Mutex<HashMap<MessageKind, Vec<MessageHandler>>>,
}

impl Inbox {
	fn deliver(&self, message: &Message) -> usize {
		// Handlers may send on the other end while running; never hold the lock.
		let handlers = self
			.handlers
			.lock()
			.get(&message.kind())
			.cloned()
			.unwrap_or_default();
		for handler in &handlers {
			handler(message);
		}
		handlers.len()
	}
}

/// One end of an in-memory connected channel pair.
#[derive(Clone)]
pub struct LoopbackChannel {
	local: Arc<Inbox>,
	remote: Arc<Inbox>,
	connected: Arc<AtomicBool>,
}

impl LoopbackChannel {
	/// Creates two connected ends.
	pub fn pair() -> (Self, Self) {
		let a = Arc::new(Inbox::default());
		let b = Arc::new(Inbox::default());
		let connected = Arc::new(AtomicBool::new(true));
		(
			Self {
				local: a.clone(),
				remote: b.clone(),
				connected: connected.clone(),
			},
			Self {
				local: b,
				remote: a,
				connected,
			},
		)
	}

	/// Tears down the link for both ends; later sends are dropped.
	pub fn disconnect(&self) {
		self.connected.store(false, Ordering::Release);
	}
}

impl std::fmt::Debug for LoopbackChannel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoopbackChannel")
			.field("connected", &self.connected.load(Ordering::Acquire))
			.finish_non_exhaustive()
	}
}

impl Channel for LoopbackChannel {
	fn send(&self, message: Message) {
		if !self.is_attached() {
			tracing::warn!(kind = ?message.kind(), "loopback disconnected; dropping message");
			return;
		}
		let delivered = self.remote.deliver(&message);
		tracing::trace!(kind = ?message.kind(), delivered, "loopback delivered");
	}

	fn on_message(&self, kind: MessageKind, handler: MessageHandler) {
		self.local.handlers.lock().entry(kind).or_default().push(handler);
	}

	fn is_attached(&self) -> bool {
		self.connected.load(Ordering::Acquire)
	}
}
