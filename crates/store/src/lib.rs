//! Story registry and presentation-state engine.
//!
//! A [`StoryStore`] keeps a catalogue of stories grouped by `/`-delimited
//! kinds, merges configuration inherited from global and kind scopes into each
//! story, composes decorators around story functions, tracks mutable per-story
//! args, orders the catalogue for presentation and fans selection/args events
//! out to an optional [`Channel`] and to local listeners.
//!
//! # Modules
//!
//! - [`id`] - Story identifier derivation
//! - [`parameters`] / [`metadata`] - Scoped configuration and its merge rules
//! - [`decorator`] - Decorator composition
//! - [`args`] - Arg defaults and partial updates
//! - [`sort`] - Presentation ordering policies
//! - [`dispatch`] - Event fan-out and deferred scheduling
//! - [`store`] - The registry itself
//! - [`config`] - TOML-backed store configuration

#![warn(missing_docs)]

pub mod args;
pub mod config;
pub mod decorator;
pub mod dispatch;
pub mod error;
pub mod id;
pub mod metadata;
pub mod parameters;
pub mod sort;
pub mod store;

pub use args::{ArgType, ArgTypes, Args};
pub use config::{DuplicatePolicy, StoreConfig};
pub use decorator::{Composer, Decorator, StoryContext, StoryFn, compose, story_fn};
pub use dispatch::{
	EventKind, Listener, ListenerId, ManualScheduler, Scheduler, StoreEvent, Task, TokioScheduler,
};
pub use error::{Result, StoreError};
pub use folio_channel::{Channel, LoopbackChannel, Message, MessageKind, Selection, StorySummary};
pub use id::{StoryId, story_id};
pub use metadata::{Metadata, MetadataResolver};
pub use parameters::Parameters;
pub use sort::{Comparator, OrderEntry, SortOrder, StorySort};
pub use store::{AddOptions, StoreBuilder, Story, StoryInput, StoryStore, StoryView};
