#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Reactive multi-level QR code list model.
//!
//! Setting the input text on a [`QrCodeModel`] starts a background
//! [`GenerationTask`] that encodes the text at every error-correction
//! [`Level`]. When the task completes, the model diffs the new per-level
//! results against the committed ones and reports the minimal list changes.
//!
//! ```text
//! set_text ──▶ SerialQueue ──▶ GenerationTask ──▶ completion channel
//!                                                     │
//!        drain_events ◀── diff/apply ◀── pump/settle ◀┘
//! ```

/// Model construction options.
pub mod config;
/// Encoder seam.
pub mod encoder;
pub mod error;
/// Level domain and per-level containers.
pub mod level;
pub mod model;
/// Result projection and list diffing.
pub mod projection;
pub mod roles;
/// Cancellable generation passes.
pub mod task;

#[cfg(test)]
mod invariants;

pub use config::ModelConfig;
pub use encoder::Encoder;
pub use error::{ConfigError, ModelError, ProjectionError};
pub use level::{Level, LevelArray, ResultArray, Variant};
pub use model::{ModelEvent, QrCodeModel};
pub use projection::{ListOp, ObservedList, diff, primary};
pub use roles::{Role, RowData};
pub use task::{GenerationTask, TaskCompletion, TaskOutput};
