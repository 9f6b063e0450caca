//! Remove plugin. Removing hides the element so the change stays revertible.

use rta_registry::Action;

use super::{Editability, EvalInput};
use crate::overlay::OverlayId;

pub(crate) fn is_editable(input: &EvalInput<'_>, overlay: OverlayId) -> Editability {
	Editability::Uniform(
		input.has_stable_id(overlay)
			&& input
				.context
				.handler_for_action(input.tree, input.overlays, overlay, Action::Remove)
				.is_some(),
	)
}
