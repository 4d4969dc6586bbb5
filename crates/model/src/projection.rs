//! Result projection: per-level results seen as a dense, ordered list.
//!
//! The observed list holds only present levels, ascending. [`diff`] turns a
//! previous and a new [`ResultArray`] into the list operations that morph one
//! projection into the other when applied left to right against the live
//! list, each position valid at the moment its operation is applied.
//!
//! # Invariants
//!
//! * Must not emit an operation for a level whose slot is unchanged.
//! * Applying `diff(a, b)` to `ObservedList::from_results(a)` in order must
//!   yield `ObservedList::from_results(b)`.

use crate::error::ProjectionError;
use crate::level::{Level, ResultArray, Variant};


/// One structural change to the observed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOp {
	Insert { position: usize, level: Level, variant: Variant },
	Remove { position: usize, level: Level },
	Update { position: usize, level: Level, variant: Variant },
}

impl ListOp {
	pub fn position(&self) -> usize {
		match self {
			Self::Insert { position, .. } | Self::Remove { position, .. } | Self::Update { position, .. } => *position,
		}
	}

	pub fn level(&self) -> Level {
		match self {
			Self::Insert { level, .. } | Self::Remove { level, .. } | Self::Update { level, .. } => *level,
		}
	}
}

/// Computes the ordered list operations turning `previous` into `next`.
pub fn diff(previous: &ResultArray, next: &ResultArray) -> Vec<ListOp> {
	let mut ops = Vec::new();
	// Length of the list prefix already transformed.
	let mut position = 0;
	for level in Level::ALL {
		match (previous.get(level), next.get(level)) {
			(None, None) => {}
			(None, Some(variant)) => {
				ops.push(ListOp::Insert {
					position,
					level,
					variant: variant.clone(),
				});
				position += 1;
			}
			(Some(_), None) => ops.push(ListOp::Remove { position, level }),
			(Some(old), Some(new)) => {
				if old != new {
					ops.push(ListOp::Update {
						position,
						level,
						variant: new.clone(),
					});
				}
				position += 1;
			}
		}
	}
	ops
}

/// Variant at the lowest present level.
pub fn primary(results: &ResultArray) -> Option<(Level, &str)> {
	results.present().next().map(|(level, variant)| (level, variant.as_str()))
}

/// Dense, level-ordered view of the present slots of a [`ResultArray`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedList {
	rows: Vec<(Level, Variant)>,
}

impl ObservedList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_results(results: &ResultArray) -> Self {
		Self {
			rows: results.present().map(|(level, variant)| (level, variant.clone())).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn get(&self, position: usize) -> Option<(Level, &str)> {
		self.rows.get(position).map(|(level, variant)| (*level, variant.as_str()))
	}

	pub fn iter(&self) -> impl Iterator<Item = (Level, &str)> {
		self.rows.iter().map(|(level, variant)| (*level, variant.as_str()))
	}

	/// Applies one operation against the current rows.
	pub fn apply(&mut self, op: &ListOp) -> Result<(), ProjectionError> {
		match op {
			ListOp::Insert { position, level, variant } => {
				let (position, level) = (*position, *level);
				if position > self.rows.len() {
					return Err(ProjectionError::OutOfBounds { position, len: self.rows.len() });
				}
				let after_prev = position == 0 || self.rows[position - 1].0 < level;
				let before_next = self.rows.get(position).is_none_or(|(next, _)| level < *next);
				if !after_prev || !before_next {
					return Err(ProjectionError::Misordered { position, level });
				}
				self.rows.insert(position, (level, variant.clone()));
			}
			ListOp::Remove { position, level } => {
				self.check_row(*position, *level)?;
				self.rows.remove(*position);
			}
			ListOp::Update { position, level, variant } => {
				self.check_row(*position, *level)?;
				self.rows[*position].1 = variant.clone();
			}
		}
		Ok(())
	}

	fn check_row(&self, position: usize, expected: Level) -> Result<(), ProjectionError> {
		let Some((found, _)) = self.rows.get(position) else {
			return Err(ProjectionError::OutOfBounds { position, len: self.rows.len() });
		};
		if *found != expected {
			return Err(ProjectionError::LevelMismatch {
				position,
				expected,
				found: *found,
			});
		}
		Ok(())
	}
}
