//! Registry lookups shared by the evaluator, the element mover and the
//! command factory.

use std::sync::Arc;

use rta_primitives::{ElementId, ElementTree, VariantScopeId};
use rta_registry::{
	Action, ActionDescriptor, CapabilityDescriptor, ChangeRegistry, DesignTimeMetadata,
	DesignTimeRegistry, Layer,
};

use crate::overlay::{OverlayArena, OverlayId};

/// Change-capability and design-time registries plus the authoring layer,
/// built once per editing session.
#[derive(Debug, Clone)]
pub struct CapabilityContext {
	changes: Arc<ChangeRegistry>,
	design_time: Arc<DesignTimeRegistry>,
	layer: Layer,
}

impl CapabilityContext {
	pub fn new(
		changes: Arc<ChangeRegistry>,
		design_time: Arc<DesignTimeRegistry>,
		layer: Layer,
	) -> Self {
		Self {
			changes,
			design_time,
			layer,
		}
	}

	pub fn layer(&self) -> Layer {
		self.layer
	}

	pub fn changes(&self) -> &ChangeRegistry {
		&self.changes
	}

	pub fn design_time(&self) -> &DesignTimeRegistry {
		&self.design_time
	}

	pub fn metadata(&self, tree: &dyn ElementTree, element: &ElementId) -> Option<&DesignTimeMetadata> {
		self.design_time.for_element(tree, element)
	}

	/// Element a change resulting from `action` on `overlay` is recorded
	/// against: the relevant container when the action asks for it (or
	/// `force_relevant_container`), otherwise the overlay's own element.
	pub fn change_subject(
		&self,
		overlays: &OverlayArena,
		overlay: OverlayId,
		action: &ActionDescriptor,
		force_relevant_container: bool,
	) -> Option<ElementId> {
		let o = overlays.get(overlay)?;
		if action.change_on_relevant_container || force_relevant_container {
			let container = o.relevant_container()?;
			return overlays.element(container).cloned();
		}
		Some(o.element().clone())
	}

	/// Looks up the change handler for `action` on `subject` in the session layer.
	pub fn change_handler(
		&self,
		tree: &dyn ElementTree,
		subject: &ElementId,
		action: &ActionDescriptor,
	) -> Option<&CapabilityDescriptor> {
		let control_type = tree.control_type(subject)?;
		self.changes
			.lookup(&control_type, &action.change_type, self.layer)
	}

	pub fn has_change_handler(
		&self,
		tree: &dyn ElementTree,
		subject: &ElementId,
		action: &ActionDescriptor,
	) -> bool {
		self.change_handler(tree, subject, action).is_some()
	}

	/// Resolves the self-action of `overlay` and its change handler, substituting
	/// the relevant container as lookup subject where the action requires it.
	pub fn handler_for_action(
		&self,
		tree: &dyn ElementTree,
		overlays: &OverlayArena,
		overlay: OverlayId,
		action: Action,
	) -> Option<(&ActionDescriptor, &CapabilityDescriptor)> {
		let element = overlays.element(overlay)?;
		let descriptor = self.metadata(tree, element)?.get_action(action)?;
		let subject = self.change_subject(overlays, overlay, descriptor, false)?;
		let handler = self.change_handler(tree, &subject, descriptor)?;
		Some((descriptor, handler))
	}

	/// Returns `true` if the first aggregation of the overlay's element that
	/// offers `action` has a registered change handler.
	pub fn check_aggregations_on_self(
		&self,
		tree: &dyn ElementTree,
		overlays: &OverlayArena,
		overlay: OverlayId,
		action: Action,
	) -> bool {
		let Some(element) = overlays.element(overlay) else {
			return false;
		};
		let Some((_, descriptor)) = self
			.metadata(tree, element)
			.and_then(|m| m.first_aggregation_action(action))
		else {
			return false;
		};
		self.change_subject(overlays, overlay, descriptor, false)
			.is_some_and(|subject| self.has_change_handler(tree, &subject, descriptor))
	}

	/// Returns `true` if the overlay's element has a stable id.
	///
	/// An element with a stable-elements function is stable when that
	/// function names its sub-elements and none of them has a generated id.
	/// Without such a function the element's own id decides. The verdict is
	/// cached on the overlay since ids cannot change at runtime.
	pub fn has_stable_id(
		&self,
		tree: &dyn ElementTree,
		overlays: &OverlayArena,
		overlay: OverlayId,
	) -> bool {
		let Some(o) = overlays.get(overlay) else {
			return false;
		};
		*o.stable_id_cache().get_or_init(|| {
			let element = o.element();
			match self.metadata(tree, element).and_then(|m| m.stable_elements_fn()) {
				Some(stable_elements) => stable_elements(tree, element).is_some_and(|subs| {
					subs.iter().all(|sub| !tree.has_generated_id(sub))
				}),
				None => !tree.has_generated_id(element),
			}
		})
	}

	/// Variant-management reference recorded on a command created for `action`.
	///
	/// Set only when the overlay belongs to a scope and the change handler of
	/// the change subject can revert its change.
	pub fn variant_management_reference(
		&self,
		tree: &dyn ElementTree,
		overlays: &OverlayArena,
		overlay: OverlayId,
		action: &ActionDescriptor,
		force_relevant_container: bool,
	) -> Option<VariantScopeId> {
		let scope = overlays.get(overlay)?.variant_management()?.clone();
		let subject = self.change_subject(overlays, overlay, action, force_relevant_container)?;
		self.change_handler(tree, &subject, action)
			.filter(|h| h.supports_revert)
			.map(|_| scope)
	}
}
