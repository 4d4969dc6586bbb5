use serde::{Deserialize, Serialize};

use crate::TaskClass;

/// Default name of the dedicated queue thread.
pub const DEFAULT_THREAD_NAME: &str = "qrclip-worker";

/// Construction options for [`crate::SerialQueue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
	/// OS thread name, visible in debuggers and tracing output.
	pub thread_name: String,
	/// Classification attached to queue tracing events.
	pub class: TaskClass,
}

impl Default for QueueConfig {
	fn default() -> Self {
		Self {
			thread_name: DEFAULT_THREAD_NAME.to_string(),
			class: TaskClass::CpuBlocking,
		}
	}
}
