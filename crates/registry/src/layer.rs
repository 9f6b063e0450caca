//! Authoring layers.
//!
//! Changes are recorded in a layer. Lower layers are shipped with the
//! application, higher layers belong to key users and end users.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Layer a change is recorded in, ordered from lowest to highest.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	Default,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
	Vendor,
	Partner,
	CustomerBase,
	#[default]
	Customer,
	User,
}

impl Layer {
	pub const fn as_set(self) -> LayerSet {
		match self {
			Self::Vendor => LayerSet::VENDOR,
			Self::Partner => LayerSet::PARTNER,
			Self::CustomerBase => LayerSet::CUSTOMER_BASE,
			Self::Customer => LayerSet::CUSTOMER,
			Self::User => LayerSet::USER,
		}
	}
}

bitflags::bitflags! {
	/// A set of layers a change handler is available in.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct LayerSet: u8 {
		const VENDOR = 1 << 0;
		const PARTNER = 1 << 1;
		const CUSTOMER_BASE = 1 << 2;
		const CUSTOMER = 1 << 3;
		const USER = 1 << 4;
	}
}

impl LayerSet {
	/// Layers available to key users and developers, excluding end-user personalization.
	pub const ADAPTATION: Self = Self::VENDOR
		.union(Self::PARTNER)
		.union(Self::CUSTOMER_BASE)
		.union(Self::CUSTOMER);

	pub fn contains_layer(self, layer: Layer) -> bool {
		self.contains(layer.as_set())
	}
}

impl From<Layer> for LayerSet {
	fn from(layer: Layer) -> Self {
		layer.as_set()
	}
}

impl FromIterator<Layer> for LayerSet {
	fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
		let mut set = LayerSet::empty();
		for layer in iter {
			set |= layer.as_set();
		}
		set
	}
}
