use qrclip_worker::QueueConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Model construction options.
///
/// ```toml
/// [queue]
/// thread_name = "qrclip-worker"
/// class = "cpu_blocking"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
	/// Worker queue running the generation tasks.
	pub queue: QueueConfig,
}

impl ModelConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}
}

#[cfg(test)]
mod tests {
	use qrclip_worker::{DEFAULT_THREAD_NAME, TaskClass};

	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		let config = ModelConfig::from_toml_str("").expect("empty config should parse");
		assert_eq!(config, ModelConfig::default());
		assert_eq!(config.queue.thread_name, DEFAULT_THREAD_NAME);
		assert_eq!(config.queue.class, TaskClass::CpuBlocking);
	}

	#[test]
	fn queue_section_overrides_fields() {
		let config = ModelConfig::from_toml_str("[queue]\nthread_name = \"qr-gen\"\nclass = \"background\"\n").expect("config should parse");
		assert_eq!(config.queue.thread_name, "qr-gen");
		assert_eq!(config.queue.class, TaskClass::Background);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = ModelConfig::from_toml_str("[queue]\nthreads = 4\n").expect_err("unknown key must fail");
		assert!(err.to_string().starts_with("invalid model configuration"));
	}
}
