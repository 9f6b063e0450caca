//! Create-container plugin.
//!
//! Votes split by relationship: `asChild` when the element's own
//! aggregations accept a new container, `asSibling` when the aggregation the
//! element sits in does.

use rta_primitives::ElementTree;
use rta_registry::{Action, ActionDescriptor};

use super::{Editability, EvalInput};
use crate::context::CapabilityContext;
use crate::overlay::{OverlayArena, OverlayId};

pub(crate) fn is_editable(input: &EvalInput<'_>, overlay: OverlayId) -> Editability {
	if !input.has_stable_id(overlay) {
		return Editability::Split {
			as_child: false,
			as_sibling: false,
		};
	}
	let as_child = input.context.check_aggregations_on_self(
		input.tree,
		input.overlays,
		overlay,
		Action::CreateContainer,
	);
	let as_sibling = sibling_action(input.context, input.tree, input.overlays, overlay).is_some();
	Editability::Split {
		as_child,
		as_sibling,
	}
}

/// Create-container action of the aggregation `overlay` sits in, provided a
/// change handler exists for it on the parent.
pub(crate) fn sibling_action<'a>(
	context: &'a CapabilityContext,
	tree: &dyn ElementTree,
	overlays: &OverlayArena,
	overlay: OverlayId,
) -> Option<&'a ActionDescriptor> {
	let element = overlays.element(overlay)?;
	let position = tree.position(element)?;
	let parent = overlays.by_element(&position.parent)?;
	let descriptor = context
		.metadata(tree, &position.parent)?
		.get_aggregation_action(&position.aggregation, Action::CreateContainer)?;
	let subject = context.change_subject(overlays, parent, descriptor, false)?;
	context
		.has_change_handler(tree, &subject, descriptor)
		.then_some(descriptor)
}
