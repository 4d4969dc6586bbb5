use serde::{Deserialize, Serialize};

/// Shared execution classes used for worker scheduling and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskClass {
	/// Background work that can be delayed or withdrawn.
	Background,
	/// CPU-intensive blocking work executed on a dedicated thread.
	CpuBlocking,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Background => "background",
			Self::CpuBlocking => "cpu_blocking",
		}
	}
}
