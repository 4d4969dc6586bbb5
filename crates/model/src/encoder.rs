use crate::level::{Level, Variant};

/// Produces the encoded variant of a text for one level.
///
/// Implementations are total: a level that cannot be satisfied yields an
/// empty variant, which the model treats as absent. Calls may be slow and
/// always run on the worker thread.
pub trait Encoder: Send + Sync + 'static {
	fn encode(&self, text: &str, level: Level) -> Variant;
}

impl<F> Encoder for F
where
	F: Fn(&str, Level) -> Variant + Send + Sync + 'static,
{
	fn encode(&self, text: &str, level: Level) -> Variant {
		self(text, level)
	}
}
