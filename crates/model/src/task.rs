//! One cancellable generation pass over every level.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use qrclip_worker::{GenerationToken, QueueError, SerialQueue, UnitHandle, panic_message};

use crate::encoder::Encoder;
use crate::level::{Level, ResultArray};

/// Generation task bound to an immutable copy of the input text.
pub struct GenerationTask {
	text: Arc<str>,
	encoder: Arc<dyn Encoder>,
}

/// Raw output of [`GenerationTask::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
	pub results: ResultArray,
	/// False when cancellation stopped the pass before the last level.
	pub complete: bool,
}

/// Completion notification for a task that ran to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
	/// Queue generation of the unit that produced this result.
	pub generation: u64,
	pub text: Arc<str>,
	pub results: ResultArray,
}

impl GenerationTask {
	pub fn new(text: impl Into<Arc<str>>, encoder: Arc<dyn Encoder>) -> Self {
		Self { text: text.into(), encoder }
	}

	/// Encodes every level in ascending order, checking `token` between levels.
	pub fn run(&self, token: &GenerationToken) -> TaskOutput {
		let mut results = ResultArray::new();
		for level in Level::ALL {
			if token.is_cancelled() {
				tracing::trace!(generation = token.generation(), stopped_at = %level, "task.cancelled");
				return TaskOutput { results, complete: false };
			}

			match std::panic::catch_unwind(AssertUnwindSafe(|| self.encoder.encode(&self.text, level))) {
				Ok(variant) if !variant.is_empty() => results[level] = Some(variant),
				Ok(_) => {}
				Err(payload) => {
					tracing::warn!(
						generation = token.generation(),
						level = %level,
						panic = %panic_message(payload.as_ref()),
						"task.level_panicked"
					);
				}
			}
		}
		TaskOutput { results, complete: true }
	}

	/// Queues the task; `on_done` fires once if the pass is not cancelled.
	pub fn submit<F>(self, queue: &SerialQueue, on_done: F) -> Result<UnitHandle, QueueError>
	where
		F: FnOnce(TaskCompletion) + Send + 'static,
	{
		queue.submit(move |token| {
			let output = self.run(token);
			if !output.complete {
				return;
			}
			tracing::trace!(generation = token.generation(), present = output.results.count(), "task.done");
			on_done(TaskCompletion {
				generation: token.generation(),
				text: self.text,
				results: output.results,
			});
		})
	}
}
