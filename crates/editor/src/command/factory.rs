//! Builds prepared commands for plugin gestures.

use rta_primitives::{
	ControlType, ElementId, ElementTree, PropertyValue, VariantKey, VariantModel, VariantScopeId,
};
use rta_registry::{Action, ActionDescriptor, CapabilityDescriptor};
use uuid::Uuid;

use super::{Command, CommandKind, CommandMeta, VariantConfiguration};
use crate::context::CapabilityContext;
use crate::error::PrepareError;
use crate::overlay::{OverlayArena, OverlayId, Relation};
use crate::plugin::control_variant::DUPLICATE_SUFFIX;
use crate::plugin::create_container;
use crate::plugin::drag_drop::MovePlan;
use crate::plugin::rename::DEFAULT_PROPERTY;

/// Turns gestures into prepared [`Command`]s.
///
/// Every method resolves the design-time action and change handler of the
/// gesture, fills in the [`CommandMeta`] and prepares the command against
/// the current state. A command returned from here can be pushed directly.
#[derive(Debug, Clone)]
pub struct CommandFactory {
	context: CapabilityContext,
}

impl CommandFactory {
	pub fn new(context: CapabilityContext) -> Self {
		Self { context }
	}

	pub fn context(&self) -> &CapabilityContext {
		&self.context
	}

	/// Resolves a self-action of `overlay` into command metadata.
	fn action_meta(
		&self,
		tree: &dyn ElementTree,
		overlays: &OverlayArena,
		overlay: OverlayId,
		action: Action,
	) -> Result<(CommandMeta, &ActionDescriptor), PrepareError> {
		let element = self.stable_element(tree, overlays, overlay)?;
		let control_type = tree
			.control_type(&element)
			.ok_or_else(|| PrepareError::ElementMissing(element.clone()))?;
		let descriptor = self
			.context
			.metadata(tree, &element)
			.and_then(|m| m.get_action(action))
			.ok_or(PrepareError::MissingAction {
				control_type,
				action,
			})?;
		let subject = self
			.context
			.change_subject(overlays, overlay, descriptor, false)
			.ok_or_else(|| PrepareError::Invalid(format!("{element} has no relevant container")))?;
		let handler = self.handler(tree, &subject, descriptor)?;
		let meta = CommandMeta {
			change_type: descriptor.change_type.clone(),
			selector: self.selector(overlays, subject, handler),
			element,
			runtime_only: false,
			variant_reference: self
				.context
				.variant_management_reference(tree, overlays, overlay, descriptor, false),
		};
		Ok((meta, descriptor))
	}

	fn stable_element(
		&self,
		tree: &dyn ElementTree,
		overlays: &OverlayArena,
		overlay: OverlayId,
	) -> Result<ElementId, PrepareError> {
		let element = overlays
			.element(overlay)
			.cloned()
			.ok_or(PrepareError::OverlayGone)?;
		if !tree.contains(&element) {
			return Err(PrepareError::ElementMissing(element));
		}
		if !self.context.has_stable_id(tree, overlays, overlay) {
			return Err(PrepareError::UnstableId(element));
		}
		Ok(element)
	}

	fn handler(
		&self,
		tree: &dyn ElementTree,
		subject: &ElementId,
		descriptor: &ActionDescriptor,
	) -> Result<&CapabilityDescriptor, PrepareError> {
		self.context
			.change_handler(tree, subject, descriptor)
			.ok_or_else(|| PrepareError::NoChangeHandler {
				control_type: tree
					.control_type(subject)
					.unwrap_or_else(|| "<unknown>".into()),
				change_kind: descriptor.change_type.clone(),
			})
	}

	/// Element the change is recorded against: the subject's relevant
	/// container when the handler asks for it.
	fn selector(
		&self,
		overlays: &OverlayArena,
		subject: ElementId,
		handler: &CapabilityDescriptor,
	) -> ElementId {
		if !handler.applies_to_relevant_container {
			return subject;
		}
		overlays
			.by_element(&subject)
			.and_then(|o| overlays.get(o)?.relevant_container())
			.and_then(|rc| overlays.element(rc).cloned())
			.unwrap_or(subject)
	}

	/// Sets the action's text property, `text` by default.
	pub fn rename(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
		text: &str,
	) -> Result<Command, PrepareError> {
		let (meta, descriptor) = self.action_meta(tree, overlays, overlay, Action::Rename)?;
		let property = descriptor
			.property
			.clone()
			.unwrap_or_else(|| DEFAULT_PROPERTY.into());
		let kind = CommandKind::Rename {
			property,
			value: PropertyValue::Text(text.to_owned()),
		};
		prepared(Command::new(meta, kind), tree, variants)
	}

	/// Hides the element of `overlay`.
	pub fn remove(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
	) -> Result<Command, PrepareError> {
		let (meta, _) = self.action_meta(tree, overlays, overlay, Action::Remove)?;
		prepared(Command::new(meta, CommandKind::Remove), tree, variants)
	}

	/// Builds the move command for a plan accepted by the element mover.
	pub fn move_element(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		plan: MovePlan,
	) -> Result<Command, PrepareError> {
		let meta = CommandMeta {
			change_type: plan.change_type,
			element: plan.element,
			selector: plan.selector,
			runtime_only: false,
			variant_reference: plan.variant_reference,
		};
		let kind = CommandKind::Move {
			source: plan.source,
			target: plan.target,
		};
		prepared(Command::new(meta, kind), tree, variants)
	}

	/// Creates a new container of `control_type` as the first child of the
	/// overlay's element, or as the sibling right after it.
	#[allow(clippy::too_many_arguments)]
	pub fn create_container(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
		relation: Relation,
		control_type: ControlType,
		title: Option<String>,
	) -> Result<Command, PrepareError> {
		let element = self.stable_element(tree, overlays, overlay)?;
		let missing = || PrepareError::MissingAction {
			control_type: tree
				.control_type(&element)
				.unwrap_or_else(|| "<unknown>".into()),
			action: Action::CreateContainer,
		};
		let (parent, aggregation, index, descriptor) = match relation {
			Relation::AsChild => {
				let (aggregation, descriptor) = self
					.context
					.metadata(tree, &element)
					.and_then(|m| m.first_aggregation_action(Action::CreateContainer))
					.ok_or_else(missing)?;
				(element.clone(), aggregation.clone(), 0, descriptor)
			}
			Relation::AsSibling => {
				let position = tree.position(&element).ok_or_else(missing)?;
				let descriptor =
					create_container::sibling_action(&self.context, tree, overlays, overlay)
						.ok_or_else(missing)?;
				(position.parent, position.aggregation, position.index + 1, descriptor)
			}
		};
		let parent_overlay = overlays
			.by_element(&parent)
			.ok_or(PrepareError::OverlayGone)?;
		let subject = self
			.context
			.change_subject(overlays, parent_overlay, descriptor, false)
			.ok_or_else(|| PrepareError::Invalid(format!("{parent} has no relevant container")))?;
		let handler = self.handler(tree, &subject, descriptor)?;
		let container = ElementId::new(format!("{parent}-container-{}", Uuid::new_v4().simple()));

		let meta = CommandMeta {
			change_type: descriptor.change_type.clone(),
			selector: self.selector(overlays, subject, handler),
			element: element.clone(),
			runtime_only: false,
			variant_reference: overlays
				.get(overlay)
				.and_then(|o| o.variant_management().cloned())
				.filter(|_| handler.supports_revert),
		};
		let kind = CommandKind::CreateContainer {
			parent,
			aggregation,
			index,
			container,
			control_type,
			title,
		};
		prepared(Command::new(meta, kind), tree, variants)
	}

	fn variant_meta(
		&self,
		overlays: &OverlayArena,
		overlay: OverlayId,
		change_type: &str,
	) -> Result<(CommandMeta, VariantScopeId), PrepareError> {
		let o = overlays.get(overlay).ok_or(PrepareError::OverlayGone)?;
		let scope = o
			.managed_scope()
			.cloned()
			.ok_or_else(|| PrepareError::NoVariantScope(o.element().clone()))?;
		let mut meta = CommandMeta::new(change_type, o.element().clone());
		meta.variant_reference = Some(scope.clone());
		Ok((meta, scope))
	}

	/// Makes `to` the current variant. Switching is runtime state and is
	/// never persisted.
	pub fn switch_variant(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
		to: VariantKey,
	) -> Result<Command, PrepareError> {
		let (mut meta, scope) = self.variant_meta(overlays, overlay, "switchVariant")?;
		meta.runtime_only = true;
		prepared(
			Command::new(meta, CommandKind::SwitchVariant { scope, to }),
			tree,
			variants,
		)
	}

	/// Copies the current variant under a fresh key and switches to it.
	pub fn duplicate_variant(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
	) -> Result<Command, PrepareError> {
		let (meta, scope) = self.variant_meta(overlays, overlay, "duplicateVariant")?;
		let source = variants.current(&scope)?;
		let title = format!("{}{DUPLICATE_SUFFIX}", variants.entry(&scope, &source)?.title);
		let kind = CommandKind::DuplicateVariant {
			scope,
			source,
			new_key: VariantKey::new(Uuid::new_v4().simple().to_string()),
			title,
		};
		prepared(Command::new(meta, kind), tree, variants)
	}

	pub fn set_variant_title(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
		key: VariantKey,
		title: String,
	) -> Result<Command, PrepareError> {
		let (meta, scope) = self.variant_meta(overlays, overlay, "setTitle")?;
		prepared(
			Command::new(meta, CommandKind::SetTitle { scope, key, title }),
			tree,
			variants,
		)
	}

	pub fn configure_variants(
		&self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
		overlays: &OverlayArena,
		overlay: OverlayId,
		changes: Vec<VariantConfiguration>,
	) -> Result<Command, PrepareError> {
		let (meta, scope) = self.variant_meta(overlays, overlay, "configureVariants")?;
		prepared(
			Command::new(meta, CommandKind::ConfigureVariants { scope, changes }),
			tree,
			variants,
		)
	}
}

fn prepared(
	mut command: Command,
	tree: &dyn ElementTree,
	variants: &dyn VariantModel,
) -> Result<Command, PrepareError> {
	command.prepare(tree, variants)?;
	Ok(command)
}
