use std::fmt;

/// Value of a single element property.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyValue {
	/// Property has never been set.
	#[default]
	Unset,
	Bool(bool),
	Int(i64),
	Text(String),
}

impl PropertyValue {
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn is_unset(&self) -> bool {
		matches!(self, Self::Unset)
	}
}

impl From<bool> for PropertyValue {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for PropertyValue {
	fn from(n: i64) -> Self {
		Self::Int(n)
	}
}

impl From<&str> for PropertyValue {
	fn from(s: &str) -> Self {
		Self::Text(s.to_owned())
	}
}

impl From<String> for PropertyValue {
	fn from(s: String) -> Self {
		Self::Text(s)
	}
}

impl fmt::Display for PropertyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unset => f.write_str("<unset>"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(n) => write!(f, "{n}"),
			Self::Text(s) => write!(f, "{s:?}"),
		}
	}
}
