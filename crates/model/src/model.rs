//! Reactive QR code list model.
//!
//! # Purpose
//!
//! * Owns the input text, the committed per-level results and at most one
//!   in-flight [`GenerationTask`].
//! * Projects committed results into a dense list and reports list, text,
//!   primary-code and busy changes as [`ModelEvent`]s.
//!
//! # Mental model
//!
//! * `Idle`: no live task. `Computing`: one live task, identified by the queue
//!   generation of its [`UnitHandle`].
//! * Tasks run on the model's own [`SerialQueue`] thread. Completions come
//!   back through a channel and are applied only when the host calls
//!   [`QrCodeModel::pump`] or [`QrCodeModel::settle`], so every state
//!   mutation happens on the host thread.
//!
//! # Invariants
//!
//! * Must hold at most one live task; `set_text` withdraws it before
//!   submitting a replacement.
//! * Must ignore completions whose generation differs from the live handle.
//! * Must clear results synchronously when text becomes empty.
//! * Must keep `is_busy()` equal to "a task handle is live".
//! * Must emit each signal at most once per transition.
//!
//! # Lifecycle
//!
//! * Create with [`QrCodeModel::new`] or [`QrCodeModel::with_config`].
//! * Call `set_text` as input changes, then `pump`/`settle` and
//!   `drain_events` to refresh views.
//! * Dropping the model withdraws the live task and joins the queue thread.

use std::sync::Arc;

use qrclip_worker::{SerialQueue, UnitHandle};
use tokio::sync::mpsc;

use crate::config::ModelConfig;
use crate::encoder::Encoder;
use crate::error::ModelError;
use crate::level::{Level, ResultArray};
use crate::projection::{ListOp, ObservedList, diff, primary};
use crate::roles::{Role, RowData};
use crate::task::{GenerationTask, TaskCompletion};


/// Change notification emitted by [`QrCodeModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
	TextChanged,
	/// The variant of the lowest present row changed.
	PrimaryChanged,
	BusyChanged,
	/// One structural list change, in application order.
	ListChanged(ListOp),
}

pub struct QrCodeModel {
	text: String,
	results: ResultArray,
	encoder: Arc<dyn Encoder>,
	current: Option<UnitHandle>,
	done_tx: mpsc::UnboundedSender<TaskCompletion>,
	done_rx: mpsc::UnboundedReceiver<TaskCompletion>,
	events: Vec<ModelEvent>,
	queue: SerialQueue,
}

impl std::fmt::Debug for QrCodeModel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QrCodeModel")
			.field("text", &self.text)
			.field("results", &self.results)
			.field("generation", &self.generation())
			.field("queue", &self.queue)
			.finish_non_exhaustive()
	}
}

impl QrCodeModel {
	pub fn new(encoder: Arc<dyn Encoder>) -> Result<Self, ModelError> {
		Self::with_config(encoder, &ModelConfig::default())
	}

	pub fn with_config(encoder: Arc<dyn Encoder>, config: &ModelConfig) -> Result<Self, ModelError> {
		let queue = SerialQueue::new(&config.queue)?;
		let (done_tx, done_rx) = mpsc::unbounded_channel();
		Ok(Self {
			text: String::new(),
			results: ResultArray::new(),
			encoder,
			current: None,
			done_tx,
			done_rx,
			events: Vec::new(),
			queue,
		})
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// Updates the input text, replacing any in-flight generation.
	pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ModelError> {
		let text = text.into();
		if self.text == text {
			return Ok(());
		}
		tracing::debug!(len = text.len(), busy = self.is_busy(), "model.set_text");

		let was_busy = self.withdraw_current();
		if text.is_empty() {
			let had_primary = self.primary().is_some();
			self.apply_ops(diff(&self.results, &ResultArray::new()));
			if was_busy {
				self.events.push(ModelEvent::BusyChanged);
			}
			if had_primary {
				self.events.push(ModelEvent::PrimaryChanged);
			}
		} else {
			let task = GenerationTask::new(text.as_str(), Arc::clone(&self.encoder));
			let done_tx = self.done_tx.clone();
			let submitted = task.submit(&self.queue, move |completion| {
				// The receiver lives as long as the model.
				let _ = done_tx.send(completion);
			});
			match submitted {
				Ok(handle) => self.current = Some(handle),
				Err(err) => {
					if was_busy {
						self.events.push(ModelEvent::BusyChanged);
					}
					return Err(err.into());
				}
			}
			if !was_busy {
				self.events.push(ModelEvent::BusyChanged);
			}
		}

		self.text = text;
		self.events.push(ModelEvent::TextChanged);
		Ok(())
	}

	/// Applies delivered completions without blocking.
	///
	/// Returns how many completions were committed; stale ones are dropped.
	pub fn pump(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(completion) = self.done_rx.try_recv() {
			if self.on_task_done(completion) {
				applied += 1;
			}
		}
		applied
	}

	/// Waits until the live task, if any, has been committed.
	pub async fn settle(&mut self) {
		while self.current.is_some() {
			let Some(completion) = self.done_rx.recv().await else {
				return;
			};
			self.on_task_done(completion);
		}
	}

	/// Takes the notifications accumulated since the last call, oldest first.
	pub fn drain_events(&mut self) -> Vec<ModelEvent> {
		std::mem::take(&mut self.events)
	}

	pub fn is_busy(&self) -> bool {
		self.current.is_some()
	}

	/// Queue generation of the live task.
	pub fn generation(&self) -> Option<u64> {
		self.current.as_ref().map(UnitHandle::generation)
	}

	/// Variant of the lowest present level.
	pub fn primary(&self) -> Option<&str> {
		primary(&self.results).map(|(_, variant)| variant)
	}

	pub fn primary_level(&self) -> Option<Level> {
		primary(&self.results).map(|(level, _)| level)
	}

	/// Committed per-level results.
	pub fn results(&self) -> &ResultArray {
		&self.results
	}

	/// Number of rows in the observed list.
	pub fn count(&self) -> usize {
		self.results.count()
	}

	pub fn at(&self, position: usize) -> Option<(Level, &str)> {
		self.results.present().nth(position).map(|(level, variant)| (level, variant.as_str()))
	}

	pub fn data(&self, position: usize, role: Role) -> Option<RowData<'_>> {
		let (level, code) = self.at(position)?;
		Some(match role {
			Role::Code => RowData::Code(code),
			Role::Level => RowData::Level(level),
		})
	}

	pub fn role_names(&self) -> impl Iterator<Item = (Role, &'static str)> {
		Role::ALL.into_iter().map(|role| (role, role.name()))
	}

	/// Snapshot of the observed list.
	pub fn observed(&self) -> ObservedList {
		ObservedList::from_results(&self.results)
	}

	#[cfg(test)]
	pub(crate) fn wait_worker_idle(&self) {
		self.queue.wait_idle();
	}

	#[cfg(test)]
	pub(crate) fn completion_sender(&self) -> mpsc::UnboundedSender<TaskCompletion> {
		self.done_tx.clone()
	}

	/// Withdraws the live task, returning whether one existed.
	fn withdraw_current(&mut self) -> bool {
		let Some(handle) = self.current.take() else {
			return false;
		};
		self.queue.withdraw(&handle);
		true
	}

	fn on_task_done(&mut self, completion: TaskCompletion) -> bool {
		if self.generation() != Some(completion.generation) {
			tracing::debug!(
				generation = completion.generation,
				current = ?self.generation(),
				"model.stale_completion"
			);
			return false;
		}
		self.current = None;

		let previous_primary = self.primary().map(str::to_owned);
		let ops = diff(&self.results, &completion.results);
		tracing::debug!(generation = completion.generation, ops = ops.len(), "model.task_done");
		self.apply_ops(ops);
		debug_assert_eq!(self.results, completion.results);

		if self.primary() != previous_primary.as_deref() {
			self.events.push(ModelEvent::PrimaryChanged);
		}
		self.events.push(ModelEvent::BusyChanged);
		true
	}

	fn apply_ops(&mut self, ops: Vec<ListOp>) {
		for op in ops {
			match &op {
				ListOp::Insert { level, variant, .. } | ListOp::Update { level, variant, .. } => {
					self.results[*level] = Some(variant.clone());
				}
				ListOp::Remove { level, .. } => self.results[*level] = None,
			}
			self.events.push(ModelEvent::ListChanged(op));
		}
	}
}

impl Drop for QrCodeModel {
	fn drop(&mut self) {
		self.withdraw_current();
	}
}
