#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Worker primitives for the qrclip model.
//!
//! * [`SerialQueue`]: strictly single-concurrency FIFO executor on a
//!   dedicated thread, with withdrawal of queued units and cooperative
//!   cancellation of the running one.
//! * [`GenerationToken`]/[`GenerationClock`]: generation-scoped identity and
//!   cancellation for queued units.
//! * [`TaskClass`]: classification attached to worker tracing events.

use std::any::Any;

mod class;
mod config;
mod error;
mod serial;
mod spawn;
mod token;

#[cfg(test)]
mod panic_tests;

pub use class::TaskClass;
pub use config::{DEFAULT_THREAD_NAME, QueueConfig};
pub use error::QueueError;
pub use serial::{SerialQueue, ShutdownReport, UnitHandle, Withdrawal};
pub use spawn::spawn_named_thread;
pub use token::{GenerationClock, GenerationToken};

/// Extracts a printable message from a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return (*msg).to_string();
	}
	if let Some(msg) = payload.downcast_ref::<String>() {
		return msg.clone();
	}
	"non-string panic payload".to_string()
}
