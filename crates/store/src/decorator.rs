//! Decorator composition.
//!
//! A decorator wraps a story invocation: it receives a zero-argument inner
//! callable plus the story context and returns the rendered value, invoking
//! the inner callable as many times as it likes. [`compose`] chains a list of
//! decorators so the first one in the list runs outermost and the story
//! function runs innermost.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::args::Args;
use crate::id::StoryId;
use crate::parameters::Parameters;

/// Context handed to story functions and decorators.
#[derive(Debug, Clone)]
pub struct StoryContext {
	/// Story identifier.
	pub id: StoryId,
	/// `/`-delimited kind path.
	pub kind: String,
	/// Story name within its kind.
	pub name: String,
	/// Merged parameters.
	pub parameters: Arc<Parameters>,
	/// Args at render time.
	pub args: Args,
}

/// A story function: renders a story for a context.
pub type StoryFn = Arc<dyn Fn(&StoryContext) -> Value + Send + Sync>;

/// Wraps a closure as a [`StoryFn`].
pub fn story_fn(f: impl Fn(&StoryContext) -> Value + Send + Sync + 'static) -> StoryFn {
	Arc::new(f)
}

type DecoratorFn = dyn Fn(&dyn Fn() -> Value, &StoryContext) -> Value + Send + Sync;

/// A wrapper composed around a story invocation.
#[derive(Clone)]
pub struct Decorator {
	name: Option<Box<str>>,
	f: Arc<DecoratorFn>,
}

impl Decorator {
	/// Creates an anonymous decorator.
	pub fn new(f: impl Fn(&dyn Fn() -> Value, &StoryContext) -> Value + Send + Sync + 'static) -> Self {
		Self {
			name: None,
			f: Arc::new(f),
		}
	}

	/// Creates a decorator carrying a name for diagnostics.
	pub fn named(
		name: &str,
		f: impl Fn(&dyn Fn() -> Value, &StoryContext) -> Value + Send + Sync + 'static,
	) -> Self {
		Self {
			name: Some(name.into()),
			f: Arc::new(f),
		}
	}

	/// Diagnostic name, if one was given.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Invokes the decorator around `inner`.
	pub fn call(&self, inner: &dyn Fn() -> Value, ctx: &StoryContext) -> Value {
		(self.f)(inner, ctx)
	}
}

impl fmt::Debug for Decorator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.name {
			Some(name) => write!(f, "Decorator({name})"),
			None => f.write_str("Decorator(<anonymous>)"),
		}
	}
}

/// Strategy that turns decorators plus a story function into one callable.
pub type Composer = fn(&[Decorator], StoryFn) -> StoryFn;

/// Chains `decorators` around `story`, first decorator outermost.
///
/// With no decorators the story function itself is returned.
pub fn compose(decorators: &[Decorator], story: StoryFn) -> StoryFn {
	decorators.iter().rev().fold(story, |inner, decorator| {
		let decorator = decorator.clone();
		let wrapped: StoryFn =
			Arc::new(move |ctx: &StoryContext| decorator.call(&|| inner(ctx), ctx));
		wrapped
	})
}
