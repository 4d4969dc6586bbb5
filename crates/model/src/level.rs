//! Error-correction level domain and the fixed-size container indexed by it.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// QR error-correction level, ordered from least to most redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
	Low,
	Medium,
	Quartile,
	High,
}

impl Level {
	pub const COUNT: usize = 4;
	/// All levels in ascending order.
	pub const ALL: [Level; Self::COUNT] = [Self::Low, Self::Medium, Self::Quartile, Self::High];

	/// Ordinal position of this level.
	pub const fn index(self) -> usize {
		self as usize
	}

	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::Quartile => "quartile",
			Self::High => "high",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Encoded output for one `(text, level)` pair.
pub type Variant = String;

/// Per-level results; an absent slot has no usable variant.
pub type ResultArray = LevelArray<Variant>;

/// One optional value per [`Level`], indexed by level ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelArray<T> {
	slots: [Option<T>; Level::COUNT],
}

impl<T> Default for LevelArray<T> {
	fn default() -> Self {
		Self {
			slots: std::array::from_fn(|_| None),
		}
	}
}

impl<T> LevelArray<T> {
	/// Creates an array with every slot absent.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_slots(slots: [Option<T>; Level::COUNT]) -> Self {
		Self { slots }
	}

	pub fn get(&self, level: Level) -> Option<&T> {
		self.slots[level.index()].as_ref()
	}

	/// Number of present slots.
	pub fn count(&self) -> usize {
		self.slots.iter().filter(|slot| slot.is_some()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.iter().all(Option::is_none)
	}

	/// Every slot in ascending level order.
	pub fn iter(&self) -> impl Iterator<Item = (Level, Option<&T>)> {
		Level::ALL.into_iter().map(move |level| (level, self.get(level)))
	}

	/// Present slots in ascending level order.
	pub fn present(&self) -> impl Iterator<Item = (Level, &T)> {
		self.iter().filter_map(|(level, value)| value.map(|value| (level, value)))
	}
}

impl<T> Index<Level> for LevelArray<T> {
	type Output = Option<T>;

	fn index(&self, level: Level) -> &Self::Output {
		&self.slots[level.index()]
	}
}

impl<T> IndexMut<Level> for LevelArray<T> {
	fn index_mut(&mut self, level: Level) -> &mut Self::Output {
		&mut self.slots[level.index()]
	}
}

impl<T> FromIterator<(Level, T)> for LevelArray<T> {
	fn from_iter<I: IntoIterator<Item = (Level, T)>>(iter: I) -> Self {
		let mut array = Self::new();
		for (level, value) in iter {
			array[level] = Some(value);
		}
		array
	}
}
