use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Issues the generation id stamped on each unit a [`SerialQueue`] accepts.
///
/// Ids start at 1 and only grow, so a larger id always names a later
/// submission on the same queue.
///
/// [`SerialQueue`]: crate::SerialQueue
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reserves the id for the next submitted unit.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Identity and stop flag of one queued unit.
///
/// The queue keeps one clone and hands another to the unit's closure, which
/// polls [`GenerationToken::is_cancelled`] between steps. Withdrawing a
/// running unit flips the flag seen by every clone.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	/// Queue generation the unit was submitted under.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// True once the unit was withdrawn while pending or running.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Asks the unit to stop at its next check.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}
}
