use std::sync::Arc;

use crate::config::StoreConfig;
use crate::dispatch::{ManualScheduler, Scheduler};
use crate::store::StoryStore;

/// Assembles a [`StoryStore`].
///
/// Defaults: [`StoreConfig::default`] and a [`ManualScheduler`] drained
/// through [`StoryStore::run_pending`]. Channels are attached on the built
/// store with [`StoryStore::attach_channel`], since they may only become
/// available later.
#[derive(Default)]
pub struct StoreBuilder {
	config: StoreConfig,
	scheduler: Option<Arc<dyn Scheduler>>,
}

impl StoreBuilder {
	/// Builder with defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the store configuration.
	pub fn config(mut self, config: StoreConfig) -> Self {
		self.config = config;
		self
	}

	/// Scheduler for deferred local selection notifications.
	pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
		self.scheduler = Some(scheduler);
		self
	}

	/// Builds a detached store.
	pub fn build(self) -> StoryStore {
		let scheduler = self
			.scheduler
			.unwrap_or_else(|| Arc::new(ManualScheduler::new()));
		let seed = self.config.seed_metadata();
		StoryStore::from_parts(self.config, seed, scheduler)
	}
}
