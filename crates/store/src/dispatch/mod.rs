//! Event fan-out to the channel and to local listeners.
//!
//! Two audiences observe store changes with different latency contracts:
//!
//! | event | channel | local listeners |
//! |---|---|---|
//! | selection changed | synchronous, only while attached | deferred through the [`Scheduler`], only when the channel was told |
//! | args changed | synchronous, only while attached | synchronous |
//! | stories configured | synchronous, only while attached | synchronous |
//!
//! Nothing is buffered while detached. Attaching re-announces the current
//! selection instead of replaying history.
//!
//! No lock is held while a channel handler or listener runs, so both may call
//! back into the store.

use std::sync::{Arc, OnceLock, Weak};

use folio_channel::{Channel, Message, Selection};
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::args::Args;
use crate::id::StoryId;
use crate::{Result, StoreError};

mod scheduler;

pub use scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};

/// Kind of a [`StoreEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// The current selection changed.
	SelectionChanged,
	/// A story's args changed.
	ArgsChanged,
	/// A registration batch finished.
	StoriesConfigured,
}

/// Event delivered to local listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
	/// Delivered on the scheduler's next turn.
	SelectionChanged(Selection),
	/// Delivered synchronously.
	ArgsChanged {
		/// Story whose args changed.
		id: StoryId,
		/// Complete args after the change.
		args: Args,
	},
	/// Delivered synchronously by `finish_configuring`.
	StoriesConfigured {
		/// Number of stories published.
		count: usize,
	},
}

impl StoreEvent {
	/// Kind used for listener lookup.
	pub fn kind(&self) -> EventKind {
		match self {
			Self::SelectionChanged(_) => EventKind::SelectionChanged,
			Self::ArgsChanged { .. } => EventKind::ArgsChanged,
			Self::StoriesConfigured { .. } => EventKind::StoriesConfigured,
		}
	}
}

/// Local event handler.
pub type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Handle returned by [`Dispatcher::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct ListenerTable {
	next_id: u64,
	by_kind: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
}

/// Routes store events to the attached channel and to local listeners.
pub struct Dispatcher {
	channel: OnceLock<Arc<dyn Channel>>,
	listeners: Mutex<ListenerTable>,
	scheduler: Arc<dyn Scheduler>,
}

impl Dispatcher {
	/// Creates a detached dispatcher deferring through `scheduler`.
	pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
		Self {
			channel: OnceLock::new(),
			listeners: Mutex::new(ListenerTable::default()),
			scheduler,
		}
	}

	/// Scheduler used for deferred events.
	pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
		&self.scheduler
	}

	/// Moves from detached to attached. A channel is attached at most once.
	pub fn attach(&self, channel: Arc<dyn Channel>) -> Result<()> {
		self.channel
			.set(channel)
			.map_err(|_| StoreError::ChannelAlreadyAttached)
	}

	/// Returns true once a channel has been attached.
	pub fn is_attached(&self) -> bool {
		self.channel.get().is_some()
	}

	/// Subscribes `listener` to events of `kind`.
	pub fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
		let mut table = self.listeners.lock();
		table.next_id += 1;
		let id = ListenerId(table.next_id);
		table.by_kind.entry(kind).or_default().push((id, listener));
		id
	}

	/// Unsubscribes a listener. Returns false if it was not registered.
	pub fn off(&self, id: ListenerId) -> bool {
		let mut table = self.listeners.lock();
		let mut removed = false;
		for listeners in table.by_kind.values_mut() {
			let before = listeners.len();
			listeners.retain(|(lid, _)| *lid != id);
			removed |= listeners.len() != before;
		}
		removed
	}

	/// Sends `message` to the channel if one is attached.
	///
	/// Returns false when detached. A channel that reports its transport down
	/// drops the message with a warning but still counts as attached.
	pub fn send(&self, message: Message) -> bool {
		let Some(channel) = self.channel.get() else {
			tracing::trace!(kind = ?message.kind(), "no channel attached; skipping send");
			return false;
		};
		if channel.is_attached() {
			channel.send(message);
		} else {
			tracing::warn!(kind = ?message.kind(), "channel transport unavailable; message dropped");
		}
		true
	}

	/// Delivers `event` to local listeners before returning.
	pub fn emit(&self, event: &StoreEvent) {
		let listeners: Vec<Listener> = self
			.listeners
			.lock()
			.by_kind
			.get(&event.kind())
			.map(|entries| entries.iter().map(|(_, l)| l.clone()).collect())
			.unwrap_or_default();
		tracing::trace!(kind = ?event.kind(), listeners = listeners.len(), "emitting store event");
		for listener in listeners {
			listener(event);
		}
	}

	/// Delivers `event` to local listeners on the scheduler's next turn.
	///
	/// Dropped silently if the dispatcher is gone by then.
	pub fn emit_deferred(self: &Arc<Self>, event: StoreEvent) {
		let dispatcher: Weak<Self> = Arc::downgrade(self);
		self.scheduler.schedule(Box::new(move || {
			if let Some(dispatcher) = dispatcher.upgrade() {
				dispatcher.emit(&event);
			}
		}));
	}

	/// Announces `selection`: channel now, local listeners on the next turn.
	///
	/// Does nothing while detached.
	pub fn announce_selection(self: &Arc<Self>, selection: Selection) {
		if self.send(Message::SelectionChanged(selection.clone())) {
			self.emit_deferred(StoreEvent::SelectionChanged(selection));
		}
	}

	/// Announces the full args of `id` to both audiences synchronously.
	pub fn announce_args(&self, id: StoryId, args: Args) {
		self.send(Message::ArgsChanged {
			story_id: id.to_string(),
			args: args.clone(),
		});
		self.emit(&StoreEvent::ArgsChanged { id, args });
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("attached", &self.is_attached())
			.finish_non_exhaustive()
	}
}
