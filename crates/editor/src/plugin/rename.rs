//! Rename plugin: edits a text property of the element itself.

use rta_registry::Action;

use super::{Editability, EvalInput};
use crate::overlay::OverlayId;

/// Property renamed when the action does not name one.
pub const DEFAULT_PROPERTY: &str = "text";

pub(crate) fn is_editable(input: &EvalInput<'_>, overlay: OverlayId) -> Editability {
	Editability::Uniform(
		input.has_stable_id(overlay)
			&& input
				.context
				.handler_for_action(input.tree, input.overlays, overlay, Action::Rename)
				.is_some(),
	)
}
