//! Drag-drop plugin and the element mover.
//!
//! The mover decides whether an overlay can be dragged at all and whether a
//! concrete drop position is legal. Both checks run against the same move
//! action lookup: the aggregation the element leaves and the aggregation it
//! enters must each offer a move action with a change handler in the
//! session's layer.

use rta_primitives::{AggregationName, ChangeKind, ElementId, ElementPosition, ElementTree, VariantScopeId};
use rta_registry::{Action, ActionDescriptor, CapabilityDescriptor};
use tracing::debug;

use super::{Editability, EvalInput};
use crate::context::CapabilityContext;
use crate::error::IllegalMoveError;
use crate::overlay::{OverlayArena, OverlayId};

pub(crate) fn is_editable(input: &EvalInput<'_>, overlay: OverlayId) -> Editability {
	let mover = ElementMover::new(input.context, input.tree, input.overlays);
	Editability::Uniform(mover.source(overlay).is_ok())
}

/// A legal move, ready to be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
	pub element: ElementId,
	pub source: ElementPosition,
	/// Target position, with the index counted after removal from the source.
	pub target: ElementPosition,
	pub change_type: ChangeKind,
	/// Element the change is recorded against.
	pub selector: ElementId,
	pub variant_reference: Option<VariantScopeId>,
}

/// Resolved move capability of one container aggregation.
struct ContainerMove<'a> {
	action: &'a ActionDescriptor,
	handler: &'a CapabilityDescriptor,
	selector: ElementId,
}

/// Validates drags and drops against the move capabilities.
pub struct ElementMover<'a> {
	context: &'a CapabilityContext,
	tree: &'a dyn ElementTree,
	overlays: &'a OverlayArena,
}

impl<'a> ElementMover<'a> {
	pub fn new(context: &'a CapabilityContext, tree: &'a dyn ElementTree, overlays: &'a OverlayArena) -> Self {
		Self {
			context,
			tree,
			overlays,
		}
	}

	/// Returns `true` if the overlay's element may leave its current container.
	pub fn is_movable(&self, overlay: OverlayId) -> bool {
		self.source(overlay).is_ok()
	}

	/// Resolves the element of `overlay`, its position and the move capability
	/// of the aggregation it sits in.
	fn source(&self, overlay: OverlayId) -> Result<(ElementId, ElementPosition, ContainerMove<'a>), IllegalMoveError> {
		let element = self
			.overlays
			.element(overlay)
			.cloned()
			.ok_or(IllegalMoveError::OverlayGone)?;
		if !self.tree.contains(&element) {
			return Err(IllegalMoveError::ElementGone(element));
		}
		if !self.context.has_stable_id(self.tree, self.overlays, overlay) {
			return Err(IllegalMoveError::UnstableId(element));
		}
		let position = self
			.tree
			.position(&element)
			.ok_or_else(|| IllegalMoveError::NotMovable(element.clone()))?;
		let container = self.container_move(&position.parent, &position.aggregation)?;
		Ok((element, position, container))
	}

	fn container_move(
		&self,
		container: &ElementId,
		aggregation: &AggregationName,
	) -> Result<ContainerMove<'a>, IllegalMoveError> {
		if !self.tree.contains(container) {
			return Err(IllegalMoveError::ElementGone(container.clone()));
		}
		let no_action = || IllegalMoveError::NoMoveAction {
			container: container.clone(),
			aggregation: aggregation.clone(),
		};
		let context = self.context;
		let action = context
			.metadata(self.tree, container)
			.and_then(|m| m.get_aggregation_action(aggregation, Action::Move))
			.ok_or_else(no_action)?;

		let subject = match self.overlays.by_element(container) {
			Some(overlay) => context
				.change_subject(self.overlays, overlay, action, false)
				.ok_or_else(no_action)?,
			None if action.change_on_relevant_container => return Err(no_action()),
			None => container.clone(),
		};
		let handler = context.change_handler(self.tree, &subject, action).ok_or_else(|| {
			IllegalMoveError::NoChangeHandler {
				control_type: self
					.tree
					.control_type(&subject)
					.unwrap_or_else(|| "<unknown>".into()),
				change_kind: action.change_type.clone(),
			}
		})?;
		let selector = if handler.applies_to_relevant_container {
			self.overlays
				.by_element(&subject)
				.and_then(|o| self.overlays.get(o)?.relevant_container())
				.and_then(|rc| self.overlays.element(rc).cloned())
				.unwrap_or(subject)
		} else {
			subject
		};
		Ok(ContainerMove {
			action,
			handler,
			selector,
		})
	}

	/// Checks dropping `overlay` at `target`. The target index counts
	/// positions after the element has been removed from its source.
	pub fn check_move(&self, overlay: OverlayId, target: &ElementPosition) -> Result<MovePlan, IllegalMoveError> {
		let (element, source, from) = self.source(overlay)?;
		let into = self.container_move(&target.parent, &target.aggregation)?;

		if self.tree.is_ancestor_or_self(&element, &target.parent) {
			return Err(IllegalMoveError::IntoOwnDescendant(element));
		}
		let same_aggregation = source.parent == target.parent && source.aggregation == target.aggregation;
		let mut len = self.tree.aggregation(&target.parent, &target.aggregation)?.len();
		if same_aggregation {
			len -= 1;
		}
		if target.index > len {
			return Err(IllegalMoveError::IndexOutOfRange {
				index: target.index,
				len,
			});
		}
		if same_aggregation && target.index == source.index {
			return Err(IllegalMoveError::SamePosition);
		}

		let variant_reference = self
			.overlays
			.get(overlay)
			.and_then(|o| o.variant_management().cloned())
			.filter(|_| from.handler.supports_revert && into.handler.supports_revert);
		debug!(%element, ?source, ?target, "move accepted");
		Ok(MovePlan {
			element,
			source,
			target: target.clone(),
			change_type: into.action.change_type.clone(),
			selector: from.selector,
			variant_reference,
		})
	}
}

/// State of one drag gesture, from drag start to drop or abort.
#[derive(Debug, Default)]
pub struct DragState {
	dragged: Option<OverlayId>,
	target: Option<ElementPosition>,
}

impl DragState {
	pub fn start(&mut self, overlay: OverlayId) {
		self.dragged = Some(overlay);
		self.target = None;
	}

	pub fn is_active(&self) -> bool {
		self.dragged.is_some()
	}

	pub fn dragged(&self) -> Option<OverlayId> {
		self.dragged
	}

	pub fn target(&self) -> Option<&ElementPosition> {
		self.target.as_ref()
	}

	/// Records the current drop target. Ignored outside a gesture.
	pub fn hover(&mut self, target: ElementPosition) {
		if self.dragged.is_some() {
			self.target = Some(target);
		}
	}

	/// Ends the gesture, returning the dragged overlay and last target.
	pub fn finish(&mut self) -> Option<(OverlayId, Option<ElementPosition>)> {
		let dragged = self.dragged.take()?;
		Some((dragged, self.target.take()))
	}

	pub fn abort(&mut self) {
		self.dragged = None;
		self.target = None;
	}
}
