use crate::level::Level;

/// Per-row data roles exposed to list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
	/// Encoded variant of the row.
	Code,
	/// Error-correction level of the row.
	Level,
}

impl Role {
	pub const ALL: [Role; 2] = [Self::Code, Self::Level];

	/// Name under which views bind this role.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Code => "qrcode",
			Self::Level => "eclevel",
		}
	}
}

/// Value of one role for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowData<'a> {
	Code(&'a str),
	Level(Level),
}
