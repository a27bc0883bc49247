//! Layered metadata resolution.
//!
//! A story's effective configuration is resolved through three scopes, from
//! most to least specific:
//!
//! 1. Story metadata (given to [`StoryStore::add`])
//! 2. Kind metadata (from [`StoryStore::add_kind_metadata`])
//! 3. Global metadata (from [`StoryStore::add_global_metadata`])
//!
//! Parameters take the most specific value per top-level key. Decorators are
//! concatenated least specific first, so global decorators wrap outermost.
//!
//! [`StoryStore::add`]: crate::StoryStore::add
//! [`StoryStore::add_kind_metadata`]: crate::StoryStore::add_kind_metadata
//! [`StoryStore::add_global_metadata`]: crate::StoryStore::add_global_metadata

use crate::decorator::Decorator;
use crate::parameters::Parameters;

/// Parameters and decorators attached to one scope.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
	/// Parameters of this scope.
	pub parameters: Parameters,
	/// Decorators of this scope, outermost first.
	pub decorators: Vec<Decorator>,
}

impl Metadata {
	/// Empty scope.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the parameters of this scope.
	pub fn with_parameters(mut self, parameters: Parameters) -> Self {
		self.parameters = parameters;
		self
	}

	/// Appends a decorator.
	pub fn with_decorator(mut self, decorator: Decorator) -> Self {
		self.decorators.push(decorator);
		self
	}

	/// Folds a later registration for the same scope into this one.
	///
	/// Parameter keys are shallow-merged with `other` winning; decorators are
	/// appended after the existing ones.
	pub fn extend(&mut self, other: Metadata) {
		self.parameters.extend_from(&other.parameters);
		self.decorators.extend(other.decorators);
	}
}

/// Resolves effective story metadata through the scope hierarchy.
///
/// The resolver is stateless and created per resolution. Missing scopes are
/// treated as empty.
///
/// # Example
///
/// ```
/// use folio_store::{Metadata, MetadataResolver, Parameters};
///
/// let global = Metadata::new().with_parameters(Parameters::new().with("layout", "padded"));
/// let story = Metadata::new().with_parameters(Parameters::new().with("layout", "centered"));
///
/// let resolver = MetadataResolver::new().with_global(&global).with_story(&story);
///
/// // Story scope wins
/// assert_eq!(resolver.merge_parameters().get("layout"), Some(&"centered".into()));
/// ```
#[derive(Default)]
pub struct MetadataResolver<'a> {
	story: Option<&'a Metadata>,
	kind: Option<&'a Metadata>,
	global: Option<&'a Metadata>,
}

impl<'a> MetadataResolver<'a> {
	/// Creates a resolver with no scopes configured.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds the story scope (highest priority).
	pub fn with_story(mut self, metadata: &'a Metadata) -> Self {
		self.story = Some(metadata);
		self
	}

	/// Adds the kind scope.
	///
	/// Overrides global parameters and is overridden by story parameters.
	pub fn with_kind(mut self, metadata: &'a Metadata) -> Self {
		self.kind = Some(metadata);
		self
	}

	/// Adds the global scope (lowest priority).
	pub fn with_global(mut self, metadata: &'a Metadata) -> Self {
		self.global = Some(metadata);
		self
	}

	fn least_specific_first(&self) -> impl Iterator<Item = &'a Metadata> {
		[self.global, self.kind, self.story].into_iter().flatten()
	}

	/// Merges parameters, story > kind > global on top-level key conflicts.
	pub fn merge_parameters(&self) -> Parameters {
		let mut merged = Parameters::new();
		for scope in self.least_specific_first() {
			merged.extend_from(&scope.parameters);
		}
		merged
	}

	/// Concatenates decorators in global, kind, story order.
	pub fn merge_decorators(&self) -> Vec<Decorator> {
		self.least_specific_first()
			.flat_map(|scope| scope.decorators.iter().cloned())
			.collect()
	}
}
