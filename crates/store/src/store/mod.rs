//! The story registry.
//!
//! [`StoryStore`] owns the catalogue (id to record), the global and kind
//! metadata scopes and the current selection, and routes every selection or
//! args change through the [`Dispatcher`].
//!
//! # Lifecycle
//!
//! Build a store with [`StoryStore::builder`], register metadata and stories,
//! optionally bracket registration with [`StoryStore::start_configuring`] /
//! [`StoryStore::finish_configuring`], attach a channel whenever it becomes
//! available, and [`StoryStore::clear`] to drop the catalogue. The handle is
//! cheap to clone and every clone shares the same state.
//!
//! # Locking
//!
//! One coarse mutex guards the catalogue, metadata and selection. It is
//! released before any channel handler, listener, decorator or story function
//! runs.

use std::sync::{Arc, Weak};

use folio_channel::{Channel, Message, MessageKind, Selection};
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::args::{self, Args};
use crate::config::{DuplicatePolicy, StoreConfig};
use crate::dispatch::{Dispatcher, EventKind, Listener, ListenerId, Scheduler, StoreEvent};
use crate::id::{StoryId, story_id};
use crate::metadata::{Metadata, MetadataResolver};
use crate::sort::{self, StorySort, kind_has_prefix};
use crate::{Result, StoreError};

mod builder;
mod record;

pub use builder::StoreBuilder;
pub use record::{AddOptions, Story, StoryInput, StoryView};
use record::{StoryDef, StoryRecord};

#[derive(Default)]
struct StoreState {
	global: Metadata,
	kinds: IndexMap<String, Metadata>,
	stories: IndexMap<StoryId, StoryRecord>,
	selection: Option<Selection>,
	revision: u64,
	configuring: bool,
}

impl StoreState {
	fn record_mut(&mut self, id: &str) -> Result<&mut StoryRecord> {
		self.stories
			.get_mut(id)
			.ok_or_else(|| StoreError::UnknownStory {
				id: StoryId::from_raw(id),
			})
	}

	fn views(&self) -> Vec<StoryView> {
		self.stories.values().map(|r| r.def.view()).collect()
	}

	/// Sort policy in effect right now.
	///
	/// Walks stories in insertion order and takes the first policy found in a
	/// story's own parameters or in the current scope of its kind. Falls back
	/// to the current global scope.
	fn sort_policy(&self) -> Result<Option<StorySort>> {
		for record in self.stories.values() {
			if let Some(policy) = record.def.own_parameters.sort_policy()? {
				return Ok(Some(policy));
			}
			if let Some(kind) = self.kinds.get(&record.def.kind)
				&& let Some(policy) = kind.parameters.sort_policy()?
			{
				return Ok(Some(policy));
			}
		}
		self.global.parameters.sort_policy()
	}
}

struct StoreInner {
	state: Mutex<StoreState>,
	dispatcher: Arc<Dispatcher>,
	config: StoreConfig,
	/// Global scope a fresh or cleared store starts from.
	seed: Metadata,
}

/// Process-local story registry. Clones share state.
#[derive(Clone)]
pub struct StoryStore {
	inner: Arc<StoreInner>,
}

impl StoryStore {
	/// Starts building a store.
	pub fn builder() -> StoreBuilder {
		StoreBuilder::new()
	}

	pub(crate) fn from_parts(config: StoreConfig, seed: Metadata, scheduler: Arc<dyn Scheduler>) -> Self {
		let state = StoreState {
			global: seed.clone(),
			..StoreState::default()
		};
		Self {
			inner: Arc::new(StoreInner {
				state: Mutex::new(state),
				dispatcher: Arc::new(Dispatcher::new(scheduler)),
				config,
				seed,
			}),
		}
	}

	fn downgrade(&self) -> Weak<StoreInner> {
		Arc::downgrade(&self.inner)
	}

	/// Configuration the store was built with.
	pub fn config(&self) -> &StoreConfig {
		&self.inner.config
	}

	/// Extends the global scope. Applies to stories added afterwards.
	pub fn add_global_metadata(&self, metadata: Metadata) {
		self.inner.state.lock().global.extend(metadata);
		tracing::debug!("global metadata extended");
	}

	/// Extends the scope of `kind`. Applies to stories added afterwards.
	pub fn add_kind_metadata(&self, kind: &str, metadata: Metadata) {
		self.inner
			.state
			.lock()
			.kinds
			.entry(kind.to_string())
			.or_default()
			.extend(metadata);
		tracing::debug!(kind, "kind metadata extended");
	}

	/// Registers a story, merging its metadata with the kind and global scopes.
	///
	/// An existing id is handled per [`DuplicatePolicy`]. `LastWins` replaces
	/// the record in place: the story keeps its catalogue position but its args
	/// start over.
	pub fn add(&self, input: StoryInput, options: AddOptions) -> Result<StoryId> {
		let id = story_id(&input.kind, &input.name);
		let mut state = self.inner.state.lock();

		let replacing = state.stories.contains_key(&id);
		if replacing {
			match self.inner.config.duplicate_policy {
				DuplicatePolicy::Reject => return Err(StoreError::DuplicateStory { id }),
				DuplicatePolicy::FirstWins => {
					tracing::debug!(story = %id, "duplicate story ignored");
					return Ok(id);
				}
				DuplicatePolicy::LastWins => {}
			}
		}

		let mut resolver = MetadataResolver::new()
			.with_global(&state.global)
			.with_story(&input.metadata);
		if let Some(kind) = state.kinds.get(&input.kind) {
			resolver = resolver.with_kind(kind);
		}
		let parameters = resolver.merge_parameters();
		let decorators = resolver.merge_decorators();
		let arg_types = args::arg_types(&parameters).map_err(|e| StoreError::InvalidArgTypes {
			id: id.clone(),
			reason: e.to_string(),
		})?;

		let def = StoryDef::new(
			id.clone(),
			input.kind,
			input.name,
			parameters,
			input.metadata.parameters,
			decorators,
			input.story_fn,
			arg_types,
			options.apply_decorators,
		);
		state.stories.insert(id.clone(), StoryRecord::new(def));
		state.revision += 1;
		tracing::debug!(story = %id, replacing, "story registered");
		Ok(id)
	}

	/// Looks up a story by kind and name.
	pub fn get(&self, kind: &str, name: &str) -> Result<Story> {
		self.get_by_id(story_id(kind, name).as_str())
	}

	/// Looks up a story by id, materializing its args if needed.
	pub fn get_by_id(&self, id: &str) -> Result<Story> {
		let mut state = self.inner.state.lock();
		let record = state.record_mut(id)?;
		let args = record.args_mut().clone();
		Ok(Story::new(record.def.clone(), args))
	}

	/// Returns true when `id` is registered.
	pub fn has_story(&self, id: &str) -> bool {
		self.inner.state.lock().stories.contains_key(id)
	}

	/// Removes a story. Unknown ids are ignored.
	pub fn remove(&self, id: &str) {
		let mut state = self.inner.state.lock();
		if state.stories.shift_remove(id).is_some() {
			state.revision += 1;
			tracing::debug!(story = id, "story removed");
		}
	}

	/// Removes every story whose kind is `kind` or nested under it.
	pub fn remove_kind(&self, kind: &str) {
		let mut state = self.inner.state.lock();
		let before = state.stories.len();
		state
			.stories
			.retain(|_, record| !kind_has_prefix(&record.def.kind, kind));
		let removed = before - state.stories.len();
		if removed > 0 {
			state.revision += 1;
		}
		tracing::debug!(kind, removed, "kind removed");
	}

	/// Public projections of every story, ordered by the sort policy.
	///
	/// Fails with [`StoreError::InvalidSortConfig`] when `options.storySort`
	/// is malformed.
	pub fn extract(&self) -> Result<IndexMap<StoryId, StoryView>> {
		let (views, policy) = {
			let state = self.inner.state.lock();
			(state.views(), state.sort_policy()?)
		};
		Ok(sort::sort_stories(views, policy.as_ref())
			.into_iter()
			.map(|view| (view.id.clone(), view))
			.collect())
	}

	/// Public projections in insertion order.
	pub fn raw(&self) -> Vec<StoryView> {
		self.inner.state.lock().views()
	}

	/// Distinct kinds in first-registration order.
	pub fn kinds(&self) -> Vec<String> {
		let state = self.inner.state.lock();
		let mut kinds: Vec<String> = Vec::new();
		for record in state.stories.values() {
			if !kinds.contains(&record.def.kind) {
				kinds.push(record.def.kind.clone());
			}
		}
		kinds
	}

	/// Stories registered under exactly `kind`, in insertion order.
	pub fn stories_for_kind(&self, kind: &str) -> Vec<StoryView> {
		self.inner
			.state
			.lock()
			.stories
			.values()
			.filter(|record| record.def.kind == kind)
			.map(|record| record.def.view())
			.collect()
	}

	/// Current args of a story.
	pub fn story_args(&self, id: &str) -> Result<Args> {
		Ok(self.inner.state.lock().record_mut(id)?.args_mut().clone())
	}

	/// Merges `partial` into the args of `id` and announces the full result to
	/// the channel and local listeners before returning.
	pub fn set_story_args(&self, id: &str, partial: Args) -> Result<()> {
		let (id, args) = {
			let mut state = self.inner.state.lock();
			let record = state.record_mut(id)?;
			let id = record.def.id.clone();
			let current = record.args_mut();
			args::merge(current, &partial);
			(id, current.clone())
		};
		tracing::trace!(story = %id, "args updated");
		self.inner.dispatcher.announce_args(id, args);
		Ok(())
	}

	/// Restores `keys` (all args when `None`) to their declared defaults and
	/// announces the result like [`StoryStore::set_story_args`].
	pub fn reset_story_args(&self, id: &str, keys: Option<&[&str]>) -> Result<()> {
		let (id, args) = {
			let mut state = self.inner.state.lock();
			let record = state.record_mut(id)?;
			let id = record.def.id.clone();
			let initial = record.initial_args();
			let current = record.args_mut();
			args::reset(current, &initial, keys);
			(id, current.clone())
		};
		tracing::trace!(story = %id, "args reset");
		self.inner.dispatcher.announce_args(id, args);
		Ok(())
	}

	/// The current selection, if any.
	pub fn selection(&self) -> Option<Selection> {
		self.inner.state.lock().selection.clone()
	}

	/// Replaces the current selection.
	///
	/// While attached, the channel is told before this returns and local
	/// listeners on the scheduler's next turn. While detached nothing is sent
	/// or queued; attaching later announces whatever is current then.
	pub fn set_selection(&self, selection: Selection) {
		let attached = {
			let mut state = self.inner.state.lock();
			state.selection = Some(selection.clone());
			self.inner.dispatcher.is_attached()
		};
		if attached {
			self.inner.dispatcher.announce_selection(selection);
		}
	}

	/// Attaches the channel, announces the current selection and subscribes to
	/// peer requests.
	///
	/// Attaching and [`StoryStore::set_selection`] serialize on the state lock,
	/// so every selection is announced once: either by the setter, when it saw
	/// the channel attached, or here.
	pub fn attach_channel(&self, channel: Arc<dyn Channel>) -> Result<()> {
		let current = {
			let state = self.inner.state.lock();
			self.inner.dispatcher.attach(channel.clone())?;
			state.selection.clone()
		};
		tracing::debug!("channel attached");
		if let Some(selection) = current {
			self.inner.dispatcher.announce_selection(selection);
		}

		let store = self.downgrade();
		channel.on_message(
			MessageKind::UpdateArgs,
			Arc::new(move |message: &Message| {
				let Message::UpdateArgs {
					story_id,
					updated_args,
				} = message
				else {
					return;
				};
				let Some(inner) = store.upgrade() else {
					return;
				};
				let store = StoryStore { inner };
				if let Err(error) = store.set_story_args(story_id, updated_args.clone()) {
					tracing::warn!(%error, "dropping args update from peer");
				}
			}),
		);

		let store = self.downgrade();
		channel.on_message(
			MessageKind::SetCurrentStory,
			Arc::new(move |message: &Message| {
				if let (Message::SetCurrentStory(selection), Some(inner)) = (message, store.upgrade()) {
					StoryStore { inner }.set_selection(selection.clone());
				}
			}),
		);

		Ok(())
	}

	/// Returns true once a channel is attached.
	pub fn is_attached(&self) -> bool {
		self.inner.dispatcher.is_attached()
	}

	/// Subscribes a local listener.
	pub fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
		self.inner.dispatcher.on(kind, listener)
	}

	/// Unsubscribes a listener. Returns false if it was not registered.
	pub fn off(&self, id: ListenerId) -> bool {
		self.inner.dispatcher.off(id)
	}

	/// Runs deferred notifications queued on a self-driven scheduler such as
	/// [`ManualScheduler`](crate::ManualScheduler).
	pub fn run_pending(&self) -> usize {
		self.inner.dispatcher.scheduler().run_pending()
	}

	/// Counter bumped by every catalogue mutation.
	pub fn revision(&self) -> u64 {
		self.inner.state.lock().revision
	}

	/// Marks the start of a registration batch.
	pub fn start_configuring(&self) {
		self.inner.state.lock().configuring = true;
		tracing::debug!("configuration started");
	}

	/// Returns true between `start_configuring` and `finish_configuring`.
	pub fn is_configuring(&self) -> bool {
		self.inner.state.lock().configuring
	}

	/// Ends a registration batch: publishes the ordered catalogue to the
	/// channel and emits [`StoreEvent::StoriesConfigured`] locally.
	pub fn finish_configuring(&self) -> Result<()> {
		let stories = self.extract()?;
		self.inner.state.lock().configuring = false;
		tracing::debug!(count = stories.len(), "configuration finished");

		self.inner.dispatcher.send(Message::SetStories {
			stories: stories.values().map(StoryView::summary).collect(),
		});
		self.inner.dispatcher.emit(&StoreEvent::StoriesConfigured {
			count: stories.len(),
		});
		Ok(())
	}

	/// Drops every story, kind scope and the selection, and resets the global
	/// scope to its configured seed. The channel and listeners stay.
	pub fn clear(&self) {
		let mut state = self.inner.state.lock();
		let revision = state.revision + 1;
		*state = StoreState {
			global: self.inner.seed.clone(),
			revision,
			..StoreState::default()
		};
		tracing::debug!("store cleared");
	}
}

impl Default for StoryStore {
	fn default() -> Self {
		StoreBuilder::new().build()
	}
}

impl std::fmt::Debug for StoryStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("StoryStore")
			.field("stories", &state.stories.len())
			.field("revision", &state.revision)
			.field("dispatcher", &self.inner.dispatcher)
			.finish()
	}
}
