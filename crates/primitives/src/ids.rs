use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Prefix the host framework uses for identifiers it generates itself.
pub const GENERATED_ID_PREFIX: &str = "__";

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub struct $name(Arc<str>);

		impl $name {
			/// Creates an identifier from any string-like value.
			pub fn new(id: impl AsRef<str>) -> Self {
				Self(Arc::from(id.as_ref()))
			}

			/// Returns the identifier as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Debug for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}({:?})", stringify!($name), &*self.0)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self::new(id)
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(Arc::from(id))
			}
		}

		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

string_id! {
	/// Identifier of a host UI element.
	ElementId
}

string_id! {
	/// Fully qualified type name of a control, e.g. `sap.m.Button`.
	ControlType
}

string_id! {
	/// Name of an aggregation (ordered child slot) on an element.
	AggregationName
}

string_id! {
	/// Identifier of a variant-management scope.
	///
	/// This is the id of the variant-management element that owns the scope.
	VariantScopeId
}

string_id! {
	/// Key of a single variant inside a scope.
	VariantKey
}

string_id! {
	/// Name of a change type, e.g. `moveControls` or `rename`.
	ChangeKind
}

impl ElementId {
	/// Returns `true` if the id carries the framework's generated-id prefix.
	pub fn looks_generated(&self) -> bool {
		self.0.starts_with(GENERATED_ID_PREFIX)
	}
}

impl From<&ElementId> for VariantScopeId {
	fn from(id: &ElementId) -> Self {
		Self(id.0.clone())
	}
}
