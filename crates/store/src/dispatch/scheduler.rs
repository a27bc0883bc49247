//! Deferred task scheduling.
//!
//! Local selection listeners must never run inside the call that changed the
//! selection. The dispatcher hands that work to a [`Scheduler`], which decides
//! when the "next turn" is: [`ManualScheduler`] queues until the host drains
//! it, [`TokioScheduler`] spawns onto a runtime.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use tokio::runtime::Handle;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Queues tasks to run after the current call stack unwinds.
pub trait Scheduler: Send + Sync {
	/// Queues `task`. Must not run it before returning.
	fn schedule(&self, task: Task);

	/// Runs queued work for schedulers that do not drive themselves.
	///
	/// Returns the number of tasks run.
	fn run_pending(&self) -> usize {
		0
	}
}

/// FIFO queue drained explicitly by its owner.
#[derive(Default)]
pub struct ManualScheduler {
	queue: Mutex<VecDeque<Task>>,
}

impl ManualScheduler {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of queued tasks.
	pub fn pending(&self) -> usize {
		self.queue.lock().len()
	}
}

impl Scheduler for ManualScheduler {
	fn schedule(&self, task: Task) {
		self.queue.lock().push_back(task);
	}

	/// Runs tasks until the queue is empty, including tasks queued while
	/// draining.
	fn run_pending(&self) -> usize {
		let mut ran = 0;
		loop {
			// Pop under the lock, run without it: tasks may schedule more work.
			let next = self.queue.lock().pop_front();
			let Some(task) = next else {
				return ran;
			};
			task();
			ran += 1;
		}
	}
}

impl fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ManualScheduler")
			.field("pending", &self.pending())
			.finish()
	}
}

/// Spawns each task onto a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
	handle: Handle,
}

impl TokioScheduler {
	/// Spawns onto the runtime behind `handle`.
	pub fn new(handle: Handle) -> Self {
		Self { handle }
	}

	/// Uses the runtime of the calling context, if any.
	pub fn try_current() -> Option<Self> {
		Handle::try_current().ok().map(Self::new)
	}
}

impl Scheduler for TokioScheduler {
	fn schedule(&self, task: Task) {
		drop(self.handle.spawn(async move { task() }));
	}
}
