//! Plugin votes on overlays.

use std::fmt;

use smallvec::SmallVec;
use strum::{AsRefStr, Display};

use crate::plugin::PluginKind;

/// Insertion relationship a split vote applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Relation {
	/// The overlay can receive a new child.
	AsChild,
	/// A new sibling can be created next to the overlay.
	AsSibling,
}

/// "Plugin P considers this overlay editable", optionally qualified by relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vote {
	pub plugin: PluginKind,
	pub relation: Option<Relation>,
}

impl Vote {
	pub const fn plain(plugin: PluginKind) -> Self {
		Self {
			plugin,
			relation: None,
		}
	}

	pub const fn qualified(plugin: PluginKind, relation: Relation) -> Self {
		Self {
			plugin,
			relation: Some(relation),
		}
	}

	/// The unqualified vote and both qualified ones.
	pub const fn all_of(plugin: PluginKind) -> [Self; 3] {
		[
			Self::plain(plugin),
			Self::qualified(plugin, Relation::AsChild),
			Self::qualified(plugin, Relation::AsSibling),
		]
	}
}

impl fmt::Display for Vote {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.relation {
			Some(relation) => write!(f, "{}.{}", self.plugin, relation),
			None => write!(f, "{}", self.plugin),
		}
	}
}

/// Votes currently held by one overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteSet(SmallVec<[Vote; 4]>);

impl VoteSet {
	pub fn insert(&mut self, vote: Vote) -> bool {
		if self.0.contains(&vote) {
			return false;
		}
		self.0.push(vote);
		true
	}

	pub fn remove(&mut self, vote: Vote) -> bool {
		let before = self.0.len();
		self.0.retain(|v| *v != vote);
		self.0.len() != before
	}

	pub fn contains(&self, vote: Vote) -> bool {
		self.0.contains(&vote)
	}

	/// Returns `true` if any vote of `plugin` is present, qualified or not.
	pub fn has_plugin(&self, plugin: PluginKind) -> bool {
		self.0.iter().any(|v| v.plugin == plugin)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Vote> {
		self.0.iter()
	}
}
