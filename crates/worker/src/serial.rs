//! Strictly serial work queue on one dedicated thread.
//!
//! # Mental model
//!
//! * Units run in submission order, one at a time, on the queue thread.
//! * Every unit gets a fresh generation id and its own cancellation token.
//! * `withdraw` removes a unit that has not started. A started unit only
//!   sees its token cancelled and keeps running until it checks the token.
//! * `shutdown` closes the queue, lets the worker drain what is still
//!   queued, and joins the thread. `Drop` calls it.
//!
//! # Failure modes
//!
//! * Panicking unit: caught on the worker thread, logged, the next unit runs.
//! * Submit after shutdown: [`QueueError::Closed`].

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tokio_util::sync::CancellationToken;

use crate::token::{GenerationClock, GenerationToken};
use crate::{QueueConfig, QueueError, TaskClass, panic_message, spawn_named_thread};


type Work = Box<dyn FnOnce(&GenerationToken) + Send + 'static>;

struct QueuedUnit {
	token: GenerationToken,
	/// Submitter span, entered while the unit runs.
	span: tracing::Span,
	work: Work,
}

struct QueueState {
	pending: VecDeque<QueuedUnit>,
	running: Option<u64>,
	closed: bool,
}

struct QueueInner {
	class: TaskClass,
	clock: GenerationClock,
	state: Mutex<QueueState>,
	work_ready: Condvar,
	idle: Condvar,
}

/// Handle to one submitted unit.
#[derive(Debug, Clone)]
pub struct UnitHandle {
	token: GenerationToken,
}

impl UnitHandle {
	/// Queue-assigned generation id, unique per queue.
	pub fn generation(&self) -> u64 {
		self.token.generation()
	}

	/// Returns true once the unit was withdrawn or cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Cancels the unit without touching the queue.
	///
	/// A pending unit with a cancelled token is skipped when dequeued.
	#[cfg(test)]
	pub(crate) fn cancel(&self) {
		self.token.cancel();
	}
}

/// Outcome of [`SerialQueue::withdraw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Withdrawal {
	/// The unit was still queued and will never run.
	Removed,
	/// The unit is running; its token is cancelled.
	Cancelled,
	/// The unit already finished or was never queued here.
	Finished,
}

/// Summary of one [`SerialQueue::shutdown`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutdownReport {
	/// Units still queued when the queue was closed; the worker ran them.
	pub drained: usize,
	/// Whether the worker thread was joined by this call.
	pub joined: bool,
}

/// Single-concurrency FIFO executor.
pub struct SerialQueue {
	inner: Arc<QueueInner>,
	thread_name: String,
	worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SerialQueue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SerialQueue")
			.field("thread_name", &self.thread_name)
			.field("class", &self.inner.class)
			.field("pending", &self.pending())
			.finish_non_exhaustive()
	}
}

impl SerialQueue {
	/// Starts the queue thread.
	pub fn new(config: &QueueConfig) -> Result<Self, QueueError> {
		let inner = Arc::new(QueueInner {
			class: config.class,
			clock: GenerationClock::new(),
			state: Mutex::new(QueueState {
				pending: VecDeque::new(),
				running: None,
				closed: false,
			}),
			work_ready: Condvar::new(),
			idle: Condvar::new(),
		});

		let worker_inner = Arc::clone(&inner);
		let worker = spawn_named_thread(config.class, config.thread_name.clone(), move || run_worker(&worker_inner)).map_err(|source| QueueError::Spawn {
			name: config.thread_name.clone(),
			source,
		})?;

		Ok(Self {
			inner,
			thread_name: config.thread_name.clone(),
			worker: Some(worker),
		})
	}

	/// Enqueues one unit of work.
	pub fn submit<F>(&self, work: F) -> Result<UnitHandle, QueueError>
	where
		F: FnOnce(&GenerationToken) + Send + 'static,
	{
		let mut state = self.inner.state.lock();
		if state.closed {
			return Err(QueueError::Closed);
		}

		let token = GenerationToken::new(self.inner.clock.next(), CancellationToken::new());
		state.pending.push_back(QueuedUnit {
			token: token.clone(),
			span: tracing::Span::current(),
			work: Box::new(work),
		});
		let pending = state.pending.len();
		drop(state);

		self.inner.work_ready.notify_one();
		tracing::trace!(
			worker_class = self.inner.class.as_str(),
			generation = token.generation(),
			pending,
			"worker.queue.submit"
		);
		Ok(UnitHandle { token })
	}

	/// Withdraws a unit: removes it if queued, cancels it if running.
	pub fn withdraw(&self, handle: &UnitHandle) -> Withdrawal {
		let generation = handle.generation();
		handle.token.cancel();

		let mut state = self.inner.state.lock();
		let (outcome, removed) = match state.pending.iter().position(|unit| unit.token.generation() == generation) {
			Some(index) => (Withdrawal::Removed, state.pending.remove(index)),
			None if state.running == Some(generation) => (Withdrawal::Cancelled, None),
			None => (Withdrawal::Finished, None),
		};
		if state.pending.is_empty() && state.running.is_none() {
			self.inner.idle.notify_all();
		}
		drop(state);
		drop(removed);

		tracing::debug!(
			worker_class = self.inner.class.as_str(),
			generation,
			outcome = ?outcome,
			"worker.queue.withdraw"
		);
		outcome
	}

	/// Number of units waiting to start.
	pub fn pending(&self) -> usize {
		self.inner.state.lock().pending.len()
	}

	/// Returns true when nothing is queued or running.
	pub fn is_idle(&self) -> bool {
		let state = self.inner.state.lock();
		state.pending.is_empty() && state.running.is_none()
	}

	/// Blocks until nothing is queued or running.
	///
	/// Must not be called from inside a unit.
	pub fn wait_idle(&self) {
		let mut state = self.inner.state.lock();
		while !state.pending.is_empty() || state.running.is_some() {
			self.inner.idle.wait(&mut state);
		}
	}

	/// Closes the queue, drains queued units and joins the worker thread.
	pub fn shutdown(&mut self) -> ShutdownReport {
		let drained = {
			let mut state = self.inner.state.lock();
			state.closed = true;
			state.pending.len()
		};
		self.inner.work_ready.notify_all();

		let Some(worker) = self.worker.take() else {
			return ShutdownReport::default();
		};
		if worker.thread().id() == std::thread::current().id() {
			tracing::warn!(thread = %self.thread_name, "worker.queue.shutdown_from_worker");
			return ShutdownReport { drained, joined: false };
		}

		let joined = worker.join().is_ok();
		tracing::debug!(thread = %self.thread_name, drained, joined, "worker.queue.shutdown");
		ShutdownReport { drained, joined }
	}
}

impl Drop for SerialQueue {
	fn drop(&mut self) {
		self.shutdown();
	}
}

fn run_worker(inner: &QueueInner) {
	loop {
		let unit = {
			let mut state = inner.state.lock();
			loop {
				if let Some(unit) = state.pending.pop_front() {
					state.running = Some(unit.token.generation());
					break unit;
				}
				if state.closed {
					return;
				}
				inner.work_ready.wait(&mut state);
			}
		};

		let QueuedUnit { token, span, work } = unit;
		let generation = token.generation();
		if token.is_cancelled() {
			tracing::trace!(worker_class = inner.class.as_str(), generation, "worker.queue.skip_cancelled");
			drop(work);
		} else {
			let _guard = span.enter();
			if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(move || work(&token))) {
				tracing::warn!(
					worker_class = inner.class.as_str(),
					generation,
					panic = %panic_message(payload.as_ref()),
					"worker.queue.unit_panicked"
				);
			}
		}

		let mut state = inner.state.lock();
		state.running = None;
		if state.pending.is_empty() {
			inner.idle.notify_all();
		}
	}
}
