//! Control-variant plugin: variant management controls and their gestures.
//!
//! A variant-management overlay manages the scope named after its own
//! element. Availability predicates require such a scope; the enabled
//! predicates then look at the variants currently in it.

use rta_primitives::{ElementTree, VariantKey, VariantModel, VariantScopeId};

use super::{Editability, EvalInput};
use crate::context::CapabilityContext;
use crate::overlay::{OverlayArena, OverlayId};

pub const CTX_VARIANT_SET_TITLE: &str = "CTX_VARIANT_SET_TITLE";
pub const CTX_VARIANT_DUPLICATE: &str = "CTX_VARIANT_DUPLICATE";
pub const CTX_VARIANT_CONFIGURE: &str = "CTX_VARIANT_CONFIGURE";
pub const CTX_VARIANT_SWITCH_SUBMENU: &str = "CTX_VARIANT_SWITCH_SUBMENU";

/// Suffix appended to the title of a duplicated variant.
pub const DUPLICATE_SUFFIX: &str = " Copy";

pub(crate) fn is_editable(input: &EvalInput<'_>, overlay: OverlayId) -> Editability {
	Editability::Uniform(
		is_variant_management(input.context, input.tree, input.overlays, overlay)
			&& input.has_stable_id(overlay),
	)
}

/// Returns `true` if the overlay's control is a variant-management control.
pub fn is_variant_management(
	context: &CapabilityContext,
	tree: &dyn ElementTree,
	overlays: &OverlayArena,
	overlay: OverlayId,
) -> bool {
	overlays
		.element(overlay)
		.and_then(|e| context.metadata(tree, e))
		.is_some_and(|m| m.is_variant_management())
}

/// One entry of the variant context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
	pub id: &'static str,
	pub rank: u16,
	pub start_section: bool,
	pub enabled: bool,
	/// Variants offered by the switch submenu. Empty for other entries.
	pub submenu: Vec<VariantMenuEntry>,
}

impl MenuItem {
	fn new(id: &'static str, rank: u16, enabled: bool) -> Self {
		Self {
			id,
			rank,
			start_section: false,
			enabled,
			submenu: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMenuEntry {
	pub key: VariantKey,
	pub title: String,
	pub current: bool,
}

/// Availability and enablement of the variant gestures on one overlay.
pub struct VariantActions<'a> {
	context: &'a CapabilityContext,
	tree: &'a dyn ElementTree,
	overlays: &'a OverlayArena,
	variants: &'a dyn VariantModel,
}

impl<'a> VariantActions<'a> {
	pub fn new(
		context: &'a CapabilityContext,
		tree: &'a dyn ElementTree,
		overlays: &'a OverlayArena,
		variants: &'a dyn VariantModel,
	) -> Self {
		Self {
			context,
			tree,
			overlays,
			variants,
		}
	}

	/// Scope managed by `overlay`, if it is a variant-management overlay
	/// registered as managing one.
	pub fn managed_scope(&self, overlay: OverlayId) -> Option<VariantScopeId> {
		if !is_variant_management(self.context, self.tree, self.overlays, overlay) {
			return None;
		}
		self.overlays.get(overlay)?.managed_scope().cloned()
	}

	fn visible_count(&self, scope: &VariantScopeId) -> usize {
		self.variants
			.variants(scope)
			.map(|v| v.iter().filter(|e| e.visible).count())
			.unwrap_or(0)
	}

	pub fn is_variant_switch_available(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay).is_some()
	}

	/// Switching needs a second visible variant to switch to.
	pub fn is_variant_switch_enabled(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay)
			.is_some_and(|scope| self.visible_count(&scope) > 1)
	}

	pub fn is_variant_duplicate_available(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay).is_some()
	}

	pub fn is_variant_duplicate_enabled(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay)
			.is_some_and(|scope| self.variants.current(&scope).is_ok())
	}

	pub fn is_rename_available(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay).is_some()
	}

	pub fn is_rename_enabled(&self, overlay: OverlayId) -> bool {
		self.is_rename_available(overlay)
	}

	pub fn is_variant_configure_available(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay).is_some()
	}

	pub fn is_variant_configure_enabled(&self, overlay: OverlayId) -> bool {
		self.managed_scope(overlay)
			.is_some_and(|scope| self.variants.variants(&scope).is_ok_and(|v| !v.is_empty()))
	}

	/// Context-menu entries for `overlay`, ordered by rank. Unavailable
	/// entries are omitted.
	pub fn menu_items(&self, overlay: OverlayId) -> Vec<MenuItem> {
		let mut items = Vec::new();
		if self.is_rename_available(overlay) {
			items.push(MenuItem::new(
				CTX_VARIANT_SET_TITLE,
				210,
				self.is_rename_enabled(overlay),
			));
		}
		if self.is_variant_duplicate_available(overlay) {
			items.push(MenuItem::new(
				CTX_VARIANT_DUPLICATE,
				220,
				self.is_variant_duplicate_enabled(overlay),
			));
		}
		if self.is_variant_configure_available(overlay) {
			items.push(MenuItem {
				start_section: true,
				..MenuItem::new(
					CTX_VARIANT_CONFIGURE,
					230,
					self.is_variant_configure_enabled(overlay),
				)
			});
		}
		if self.is_variant_switch_available(overlay) {
			items.push(MenuItem {
				submenu: self.switch_entries(overlay),
				..MenuItem::new(
					CTX_VARIANT_SWITCH_SUBMENU,
					240,
					self.is_variant_switch_enabled(overlay),
				)
			});
		}
		items
	}

	/// Visible variants of the managed scope, flagged with the current one.
	pub fn switch_entries(&self, overlay: OverlayId) -> Vec<VariantMenuEntry> {
		let Some(scope) = self.managed_scope(overlay) else {
			return Vec::new();
		};
		let current = self.variants.current(&scope).ok();
		self.variants
			.variants(&scope)
			.unwrap_or_default()
			.into_iter()
			.filter(|e| e.visible)
			.map(|e| VariantMenuEntry {
				current: current.as_ref() == Some(&e.key),
				key: e.key,
				title: e.title,
			})
			.collect()
	}
}
