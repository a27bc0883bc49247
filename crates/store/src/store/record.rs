//! Story records and the handles handed out for them.

use std::fmt;
use std::sync::{Arc, OnceLock};

use folio_channel::StorySummary;
use serde_json::Value;

use crate::args::{self, ArgTypes, Args};
use crate::decorator::{self, Composer, Decorator, StoryContext, StoryFn};
use crate::id::StoryId;
use crate::metadata::Metadata;
use crate::parameters::Parameters;

/// Caller-supplied description of a story to register.
#[derive(Clone)]
pub struct StoryInput {
	/// `/`-delimited kind path.
	pub kind: String,
	/// Story name within its kind.
	pub name: String,
	/// Undecorated story function.
	pub story_fn: StoryFn,
	/// Story-scope parameters and decorators.
	pub metadata: Metadata,
}

impl StoryInput {
	/// Input without story-scope metadata.
	pub fn new(kind: impl Into<String>, name: impl Into<String>, story_fn: StoryFn) -> Self {
		Self {
			kind: kind.into(),
			name: name.into(),
			story_fn,
			metadata: Metadata::default(),
		}
	}

	/// Sets story-scope parameters.
	pub fn with_parameters(mut self, parameters: Parameters) -> Self {
		self.metadata.parameters = parameters;
		self
	}

	/// Appends a story-scope decorator.
	pub fn with_decorator(mut self, decorator: Decorator) -> Self {
		self.metadata.decorators.push(decorator);
		self
	}
}

impl fmt::Debug for StoryInput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StoryInput")
			.field("kind", &self.kind)
			.field("name", &self.name)
			.field("metadata", &self.metadata)
			.finish_non_exhaustive()
	}
}

/// Options for [`StoryStore::add`](crate::StoryStore::add).
#[derive(Debug, Clone, Copy)]
pub struct AddOptions {
	/// Builds the decorated callable from the merged decorators.
	pub apply_decorators: Composer,
}

impl Default for AddOptions {
	fn default() -> Self {
		Self {
			apply_decorators: decorator::compose,
		}
	}
}

/// Immutable part of a registered story.
pub(crate) struct StoryDef {
	pub(crate) id: StoryId,
	pub(crate) kind: String,
	pub(crate) name: String,
	pub(crate) parameters: Arc<Parameters>,
	/// Parameters given to `add` for this story alone, before merging.
	pub(crate) own_parameters: Parameters,
	pub(crate) decorators: Arc<[Decorator]>,
	pub(crate) story_fn: StoryFn,
	pub(crate) arg_types: ArgTypes,
	pub(crate) apply_decorators: Composer,
	decorated: OnceLock<StoryFn>,
}

impl StoryDef {
	#[allow(clippy::too_many_arguments, reason = "constructor for all fields")]
	pub(crate) fn new(
		id: StoryId,
		kind: String,
		name: String,
		parameters: Parameters,
		own_parameters: Parameters,
		decorators: Vec<Decorator>,
		story_fn: StoryFn,
		arg_types: ArgTypes,
		apply_decorators: Composer,
	) -> Self {
		Self {
			id,
			kind,
			name,
			parameters: Arc::new(parameters),
			own_parameters,
			decorators: decorators.into(),
			story_fn,
			arg_types,
			apply_decorators,
			decorated: OnceLock::new(),
		}
	}

	pub(crate) fn view(&self) -> StoryView {
		StoryView {
			id: self.id.clone(),
			kind: self.kind.clone(),
			name: self.name.clone(),
			parameters: self.parameters.clone(),
		}
	}
}

/// Registry entry: the immutable definition plus lazily materialized args.
pub(crate) struct StoryRecord {
	pub(crate) def: Arc<StoryDef>,
	args: Option<Args>,
}

impl StoryRecord {
	pub(crate) fn new(def: StoryDef) -> Self {
		Self {
			def: Arc::new(def),
			args: None,
		}
	}

	/// Current args, seeding them from declared defaults on first access.
	pub(crate) fn args_mut(&mut self) -> &mut Args {
		self.args
			.get_or_insert_with(|| args::materialize(&self.def.arg_types))
	}

	pub(crate) fn initial_args(&self) -> Args {
		args::materialize(&self.def.arg_types)
	}
}

/// Snapshot handle to a registered story.
///
/// Holds the args current at lookup time; later updates are not reflected.
#[derive(Clone)]
pub struct Story {
	def: Arc<StoryDef>,
	args: Args,
}

impl Story {
	pub(crate) fn new(def: Arc<StoryDef>, args: Args) -> Self {
		Self { def, args }
	}

	/// Story identifier.
	pub fn id(&self) -> &StoryId {
		&self.def.id
	}

	/// `/`-delimited kind path.
	pub fn kind(&self) -> &str {
		&self.def.kind
	}

	/// Story name within its kind.
	pub fn name(&self) -> &str {
		&self.def.name
	}

	/// Merged parameters.
	pub fn parameters(&self) -> &Parameters {
		&self.def.parameters
	}

	/// Merged decorators, global first.
	pub fn decorators(&self) -> &[Decorator] {
		&self.def.decorators
	}

	/// Args at lookup time.
	pub fn args(&self) -> &Args {
		&self.args
	}

	/// The undecorated story function.
	pub fn story_fn(&self) -> &StoryFn {
		&self.def.story_fn
	}

	/// The decorated callable, composed on first use and cached per story.
	pub fn decorated(&self) -> StoryFn {
		self.def
			.decorated
			.get_or_init(|| (self.def.apply_decorators)(&self.def.decorators, self.def.story_fn.clone()))
			.clone()
	}

	/// Context the story renders with.
	pub fn context(&self) -> StoryContext {
		StoryContext {
			id: self.def.id.clone(),
			kind: self.def.kind.clone(),
			name: self.def.name.clone(),
			parameters: self.def.parameters.clone(),
			args: self.args.clone(),
		}
	}

	/// Runs the decorated story with its current context.
	pub fn render(&self) -> Value {
		(self.decorated())(&self.context())
	}

	/// Public projection.
	pub fn view(&self) -> StoryView {
		self.def.view()
	}
}

impl fmt::Debug for Story {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Story")
			.field("id", &self.def.id)
			.field("kind", &self.def.kind)
			.field("name", &self.def.name)
			.field("args", &self.args)
			.finish_non_exhaustive()
	}
}

/// Public projection of a story: no args, decorators or story function.
#[derive(Debug, Clone)]
pub struct StoryView {
	/// Story identifier.
	pub id: StoryId,
	/// `/`-delimited kind path.
	pub kind: String,
	/// Story name within its kind.
	pub name: String,
	/// Merged parameters.
	pub parameters: Arc<Parameters>,
}

impl StoryView {
	/// Wire form published to the channel.
	pub fn summary(&self) -> StorySummary {
		StorySummary {
			id: self.id.to_string(),
			kind: self.kind.clone(),
			name: self.name.clone(),
			parameters: self.parameters.values().clone(),
		}
	}
}
