use thiserror::Error;

/// Errors raised by [`crate::SerialQueue`].
#[derive(Debug, Error)]
pub enum QueueError {
	/// The queue was shut down and no longer accepts work.
	#[error("worker queue is closed")]
	Closed,
	/// The dedicated worker thread could not be started.
	#[error("failed to spawn worker thread `{name}`")]
	Spawn {
		name: String,
		#[source]
		source: std::io::Error,
	},
}
