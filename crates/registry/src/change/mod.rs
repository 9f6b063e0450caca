//! Change-capability registry.

use rta_primitives::{ChangeKind, ControlType};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::RegistryError;
use crate::layer::{Layer, LayerSet};

/// What a registered change handler can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityDescriptor {
	/// The handler can revert its change, which is required for changes that
	/// are scoped to a variant.
	pub supports_revert: bool,
	/// The change is recorded against the element's relevant container.
	pub applies_to_relevant_container: bool,
}

impl CapabilityDescriptor {
	pub const fn revertible() -> Self {
		Self {
			supports_revert: true,
			applies_to_relevant_container: false,
		}
	}

	pub const fn on_relevant_container(mut self) -> Self {
		self.applies_to_relevant_container = true;
		self
	}
}

#[derive(Debug, Clone)]
struct HandlerEntry {
	layers: LayerSet,
	descriptor: CapabilityDescriptor,
}

type HandlerKey = (ControlType, ChangeKind);

/// Collects change handlers before freezing them into a [`ChangeRegistry`].
#[derive(Debug, Default)]
pub struct ChangeRegistryBuilder {
	handlers: FxHashMap<HandlerKey, Vec<HandlerEntry>>,
}

impl ChangeRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a handler for `control_type`/`change_kind` in `layers`.
	///
	/// Fails if another handler for the same pair already claims one of the layers.
	pub fn register(
		&mut self,
		control_type: impl Into<ControlType>,
		change_kind: impl Into<ChangeKind>,
		layers: impl Into<LayerSet>,
		descriptor: CapabilityDescriptor,
	) -> Result<&mut Self, RegistryError> {
		let key = (control_type.into(), change_kind.into());
		let layers = layers.into();
		let entries = self.handlers.entry(key.clone()).or_default();
		if entries.iter().any(|e| e.layers.intersects(layers)) {
			let (control_type, change_kind) = key;
			return Err(RegistryError::DuplicateHandler {
				control_type,
				change_kind,
				layers,
			});
		}
		trace!(control = %key.0, change = %key.1, ?layers, "change handler registered");
		entries.push(HandlerEntry { layers, descriptor });
		Ok(self)
	}

	pub fn build(self) -> ChangeRegistry {
		ChangeRegistry {
			handlers: self.handlers,
		}
	}
}

/// Immutable lookup from (control type, change kind, layer) to a handler.
#[derive(Debug, Clone, Default)]
pub struct ChangeRegistry {
	handlers: FxHashMap<HandlerKey, Vec<HandlerEntry>>,
}

impl ChangeRegistry {
	pub fn builder() -> ChangeRegistryBuilder {
		ChangeRegistryBuilder::new()
	}

	/// Returns the handler registered for the pair in `layer`, if any.
	pub fn lookup(
		&self,
		control_type: &ControlType,
		change_kind: &ChangeKind,
		layer: Layer,
	) -> Option<&CapabilityDescriptor> {
		self.handlers
			.get(&(control_type.clone(), change_kind.clone()))?
			.iter()
			.find(|e| e.layers.contains_layer(layer))
			.map(|e| &e.descriptor)
	}

	pub fn has_handler(&self, control_type: &ControlType, change_kind: &ChangeKind, layer: Layer) -> bool {
		self.lookup(control_type, change_kind, layer).is_some()
	}

	/// Number of (control type, change kind) pairs with at least one handler.
	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}
