//! The editing session.
//!
//! [`AuthoringSession`] owns the overlay arena, the plugin evaluator, the
//! command factory and the command stack for one editing session, together
//! with handles to the host's element tree and variant model. Hosts report
//! their own mutations through [`AuthoringSession::element_modified`];
//! mutations made by commands are fed back automatically after every push,
//! undo and redo.

use std::mem;
use std::sync::Arc;

use rta_primitives::{ControlType, ElementId, ElementPosition, ElementTree, VariantKey, VariantModel, VariantScopeId};
use rta_registry::{ChangeRegistry, DesignTimeRegistry};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::command::{Command, CommandContext, CommandEffect, CommandFactory, CommandStack, Direction, VariantConfiguration};
use crate::config::AuthoringConfig;
use crate::context::CapabilityContext;
use crate::error::{DuplicateTitleError, IllegalMoveError, PrepareError, RenameError, StackError};
use crate::event::{AuthoringEvent, ElementMutation};
use crate::overlay::{OverlayArena, OverlayId, Relation};
use crate::plugin::control_variant::{self, MenuItem, VariantActions};
use crate::plugin::drag_drop::{DragState, ElementMover};
use crate::plugin::{EditabilityEvaluator, PluginKind};
use crate::rename::{RenameTicket, RenameTracker, TitleValidator};

/// Association naming the elements a variant-management control governs.
pub const VARIANT_MANAGEMENT_FOR: &str = "for";

pub struct AuthoringSession<T, V> {
	config: AuthoringConfig,
	tree: T,
	variants: V,
	overlays: OverlayArena,
	evaluator: EditabilityEvaluator,
	factory: CommandFactory,
	stack: CommandStack,
	events: Vec<AuthoringEvent>,
	drag: DragState,
	rename: RenameTracker,
	/// Scopes waiting for their `for` targets to be registered.
	scope_targets: FxHashMap<ElementId, VariantScopeId>,
}

impl<T: ElementTree, V: VariantModel> AuthoringSession<T, V> {
	pub fn new(
		config: AuthoringConfig,
		changes: Arc<ChangeRegistry>,
		design_time: Arc<DesignTimeRegistry>,
		tree: T,
		variants: V,
	) -> Self {
		let context = CapabilityContext::new(changes, design_time, config.layer);
		debug!(layer = %config.layer, plugins = ?config.plugins, "authoring session started");
		Self {
			evaluator: EditabilityEvaluator::new(context.clone(), config.plugins.clone()),
			factory: CommandFactory::new(context),
			stack: CommandStack::with_limit(config.history_limit),
			config,
			tree,
			variants,
			overlays: OverlayArena::new(),
			events: Vec::new(),
			drag: DragState::default(),
			rename: RenameTracker::new(),
			scope_targets: FxHashMap::default(),
		}
	}

	pub fn config(&self) -> &AuthoringConfig {
		&self.config
	}

	pub fn tree(&self) -> &T {
		&self.tree
	}

	/// Mutable access for host-side changes. Report each one through
	/// [`element_modified`](Self::element_modified).
	pub fn tree_mut(&mut self) -> &mut T {
		&mut self.tree
	}

	pub fn variants(&self) -> &V {
		&self.variants
	}

	pub fn variants_mut(&mut self) -> &mut V {
		&mut self.variants
	}

	pub fn overlays(&self) -> &OverlayArena {
		&self.overlays
	}

	pub fn overlay_of(&self, element: &ElementId) -> Option<OverlayId> {
		self.overlays.by_element(element)
	}

	pub fn evaluator(&self) -> &EditabilityEvaluator {
		&self.evaluator
	}

	pub fn factory(&self) -> &CommandFactory {
		&self.factory
	}

	pub fn stack(&self) -> &CommandStack {
		&self.stack
	}

	pub fn stack_mut(&mut self) -> &mut CommandStack {
		&mut self.stack
	}

	/// Drains the events emitted since the last call.
	pub fn take_events(&mut self) -> Vec<AuthoringEvent> {
		mem::take(&mut self.events)
	}

	pub fn is_editable_by(&self, overlay: OverlayId, plugin: PluginKind, relation: Option<Relation>) -> bool {
		self.evaluator
			.is_editable_by(&self.overlays, overlay, plugin, relation)
	}

	/// Registers overlays for `element` and its unregistered descendants,
	/// resolves their variant-management scope and evaluates their
	/// editability.
	pub fn register_element(&mut self, element: &ElementId) -> Vec<OverlayId> {
		let created = self.overlays.register(&self.tree, element);
		for &id in &created {
			self.attach_variant_management(id);
			self.evaluator
				.register_overlay(&self.tree, &mut self.overlays, id);
			self.events.push(AuthoringEvent::OverlayRegistered(id));
		}
		created
	}

	fn attach_variant_management(&mut self, id: OverlayId) {
		let Some(element) = self.overlays.element(id).cloned() else {
			return;
		};
		let context = self.evaluator.context();
		if control_variant::is_variant_management(context, &self.tree, &self.overlays, id) {
			let scope = VariantScopeId::from(&element);
			if let Some(o) = self.overlays.get_mut(id) {
				o.set_managed_scope(Some(scope.clone()));
				o.set_variant_management(Some(scope.clone()));
			}
			for target in self.tree.association(&element, VARIANT_MANAGEMENT_FOR) {
				self.scope_targets.insert(target.clone(), scope.clone());
				if let Some(target) = self.overlays.by_element(&target) {
					self.overlays.propagate_variant_management(target, &scope);
				}
			}
		} else if let Some(scope) = self.scope_targets.get(&element).cloned() {
			self.overlays.propagate_variant_management(id, &scope);
		} else {
			self.overlays.inherit_variant_management(id);
		}
	}

	/// Removes the overlays of `element` and its descendants, retracting
	/// their votes. A rename or drag on one of them is cancelled.
	pub fn deregister_element(&mut self, element: &ElementId) -> usize {
		let Some(root) = self.overlays.by_element(element) else {
			return 0;
		};
		let mut doomed = vec![root];
		doomed.extend(self.overlays.descendants(root));
		for &id in &doomed {
			self.evaluator.deregister_overlay(&mut self.overlays, id);
		}
		if let Some(overlay) = self.rename.cancel_if_removed(&doomed) {
			self.events.push(AuthoringEvent::RenameEnded(overlay));
		}
		if self.drag.dragged().is_some_and(|d| doomed.contains(&d)) {
			debug!(%element, "drag aborted, dragged overlay removed");
			self.drag.abort();
		}

		let removed = self.overlays.remove(element);
		for (_, overlay) in &removed {
			let gone = overlay.element();
			let own_scope = VariantScopeId::from(gone);
			self.scope_targets
				.retain(|target, scope| target != gone && *scope != own_scope);
			self.events
				.push(AuthoringEvent::OverlayDeregistered(gone.clone()));
		}
		removed.len()
	}

	/// Processes a mutation of `element`: keeps the overlay tree in line with
	/// aggregation changes and re-evaluates editability where the mutation
	/// can affect it. Returns the re-evaluated overlays.
	pub fn element_modified(&mut self, element: &ElementId, mutation: ElementMutation) -> Vec<OverlayId> {
		let owner = self.overlays.by_element(element);
		match &mutation {
			ElementMutation::InsertAggregation { child, .. } if owner.is_some() => {
				if self.overlays.by_element(child).is_some() {
					self.relink(child);
				} else {
					self.register_element(child);
				}
			}
			ElementMutation::RemoveAggregation { child, .. } => {
				if self.tree.position(child).is_none() {
					self.deregister_element(child);
				} else {
					self.relink(child);
				}
			}
			_ => {}
		}
		let Some(owner) = owner.filter(|o| self.overlays.contains(*o)) else {
			return Vec::new();
		};
		self.evaluator
			.reevaluate(&self.tree, &mut self.overlays, owner, &mutation)
	}

	fn relink(&mut self, element: &ElementId) {
		if let Some(id) = self.overlays.relink(&self.tree, element) {
			self.overlays.refresh_variant_management(id);
		}
	}

	fn apply_effects(&mut self, effects: Vec<CommandEffect>) {
		for effect in effects {
			match effect {
				CommandEffect::Mutation { owner, mutation } => {
					self.element_modified(&owner, mutation);
				}
				CommandEffect::Destroyed(element) => {
					self.deregister_element(&element);
				}
				CommandEffect::Created(element) => trace!(%element, "element created"),
				CommandEffect::VariantsChanged(scope) => trace!(%scope, "variants changed"),
			}
		}
	}

	fn emit(&mut self, command: Command) {
		trace!(command = command.name(), element = %command.element(), "element modified");
		self.events.push(AuthoringEvent::ElementModified(command));
	}

	fn require_vote(&self, overlay: OverlayId, plugin: PluginKind, relation: Option<Relation>) -> Result<(), PrepareError> {
		let element = self
			.overlays
			.element(overlay)
			.ok_or(PrepareError::OverlayGone)?;
		if self.is_editable_by(overlay, plugin, relation) {
			Ok(())
		} else {
			Err(PrepareError::NotEditable {
				element: element.clone(),
				plugin,
			})
		}
	}

	/// Executes and records `command`, then syncs overlays with its effects.
	pub fn push(&mut self, command: Command) -> Result<(), StackError> {
		let mut cx = CommandContext::new(&mut self.tree, &mut self.variants);
		let effects = self.stack.push(command, &mut cx)?.effects(Direction::Execute);
		self.apply_effects(effects);
		Ok(())
	}

	/// Undoes the last command. Returns `false` if there was nothing to undo.
	pub fn undo(&mut self) -> Result<bool, StackError> {
		let mut cx = CommandContext::new(&mut self.tree, &mut self.variants);
		let Some(effects) = self.stack.undo(&mut cx)?.map(|c| c.effects(Direction::Undo)) else {
			return Ok(false);
		};
		self.apply_effects(effects);
		Ok(true)
	}

	/// Redoes the next command. Returns `false` if there was nothing to redo.
	pub fn redo(&mut self) -> Result<bool, StackError> {
		let mut cx = CommandContext::new(&mut self.tree, &mut self.variants);
		let Some(effects) = self.stack.redo(&mut cx)?.map(|c| c.effects(Direction::Execute)) else {
			return Ok(false);
		};
		self.apply_effects(effects);
		Ok(true)
	}

	/// Pushes the commands of all pending [`AuthoringEvent::ElementModified`]
	/// events in emission order. Other events stay queued. Stops at the first
	/// failure: the failed command was rolled back and is dropped, the
	/// events after it stay queued.
	pub fn commit_pending(&mut self) -> Result<usize, StackError> {
		let mut pending = mem::take(&mut self.events).into_iter();
		let mut kept = Vec::new();
		let mut pushed = 0;
		let mut result = Ok(());
		while let Some(event) = pending.next() {
			match event {
				AuthoringEvent::ElementModified(command) => {
					if let Err(e) = self.push(command) {
						result = Err(e);
						break;
					}
					pushed += 1;
				}
				other => kept.push(other),
			}
		}
		kept.extend(pending);
		let emitted = mem::replace(&mut self.events, kept);
		self.events.extend(emitted);
		result.map(|()| pushed)
	}

	/// Ends the session: cancels gestures and drops history.
	pub fn end(&mut self) {
		if let Some(overlay) = self.rename.cancel() {
			self.events.push(AuthoringEvent::RenameEnded(overlay));
		}
		self.drag.abort();
		self.stack.clear();
		debug!("authoring session ended");
	}

	pub fn rename(&mut self, overlay: OverlayId, text: &str) -> Result<(), PrepareError> {
		self.require_vote(overlay, PluginKind::Rename, None)?;
		let command = self
			.factory
			.rename(&self.tree, &self.variants, &self.overlays, overlay, text)?;
		self.emit(command);
		Ok(())
	}

	pub fn remove(&mut self, overlay: OverlayId) -> Result<(), PrepareError> {
		self.require_vote(overlay, PluginKind::Remove, None)?;
		let command = self
			.factory
			.remove(&self.tree, &self.variants, &self.overlays, overlay)?;
		self.emit(command);
		Ok(())
	}

	pub fn create_container(
		&mut self,
		overlay: OverlayId,
		relation: Relation,
		control_type: impl Into<ControlType>,
		title: Option<String>,
	) -> Result<(), PrepareError> {
		self.require_vote(overlay, PluginKind::CreateContainer, Some(relation))?;
		let command = self.factory.create_container(
			&self.tree,
			&self.variants,
			&self.overlays,
			overlay,
			relation,
			control_type.into(),
			title,
		)?;
		self.emit(command);
		Ok(())
	}

	/// Starts dragging `overlay`. Returns `false` if it is not draggable.
	pub fn drag_start(&mut self, overlay: OverlayId) -> bool {
		if !self.is_editable_by(overlay, PluginKind::DragDrop, None) {
			return false;
		}
		self.events.push(AuthoringEvent::DragStarted(overlay));
		self.drag.start(overlay);
		self.overlays.clear_selection();
		debug!(?overlay, "drag started");
		true
	}

	/// Records the position the dragged overlay currently hovers.
	pub fn drag_over(&mut self, target: ElementPosition) {
		self.drag.hover(target);
	}

	/// Drops the dragged overlay on the last hovered position.
	///
	/// The dragged overlay ends up as the only selected and the focused
	/// overlay. Emits exactly one [`AuthoringEvent::ElementModified`] if the
	/// drop is legal and returns `Ok(true)`. An illegal drop mutates nothing
	/// and emits nothing.
	pub fn drag_end(&mut self) -> Result<bool, IllegalMoveError> {
		let Some((dragged, target)) = self.drag.finish() else {
			return Ok(false);
		};
		self.overlays.clear_selection();
		self.overlays.set_selected(dragged, true);
		self.overlays.focus(dragged);
		let Some(target) = target else {
			debug!(?dragged, "drag ended without target");
			return Ok(false);
		};

		let mover = ElementMover::new(self.evaluator.context(), &self.tree, &self.overlays);
		let plan = match mover.check_move(dragged, &target) {
			Ok(plan) => plan,
			Err(e) => {
				debug!(?dragged, ?target, error = %e, "drop rejected");
				return Err(e);
			}
		};
		let command = self
			.factory
			.move_element(&self.tree, &self.variants, plan)?;
		self.emit(command);
		Ok(true)
	}

	/// Abandons the drag gesture without emitting anything.
	pub fn drag_abort(&mut self) {
		if let Some(overlay) = self.drag.dragged() {
			debug!(?overlay, "drag aborted");
		}
		self.drag.abort();
	}

	/// Availability and menu entries of the variant gestures.
	pub fn variant_actions(&self) -> VariantActions<'_> {
		VariantActions::new(
			self.evaluator.context(),
			&self.tree,
			&self.overlays,
			&self.variants,
		)
	}

	pub fn menu_items(&self, overlay: OverlayId) -> Vec<MenuItem> {
		if !self.is_editable_by(overlay, PluginKind::ControlVariant, None) {
			return Vec::new();
		}
		self.variant_actions().menu_items(overlay)
	}

	pub fn switch_variant(&mut self, overlay: OverlayId, to: impl Into<VariantKey>) -> Result<(), PrepareError> {
		self.require_vote(overlay, PluginKind::ControlVariant, None)?;
		let command = self.factory.switch_variant(
			&self.tree,
			&self.variants,
			&self.overlays,
			overlay,
			to.into(),
		)?;
		self.emit(command);
		Ok(())
	}

	pub fn duplicate_variant(&mut self, overlay: OverlayId) -> Result<(), PrepareError> {
		self.require_vote(overlay, PluginKind::ControlVariant, None)?;
		let command = self
			.factory
			.duplicate_variant(&self.tree, &self.variants, &self.overlays, overlay)?;
		self.emit(command);
		Ok(())
	}

	pub fn configure_variants(
		&mut self,
		overlay: OverlayId,
		changes: Vec<VariantConfiguration>,
	) -> Result<(), PrepareError> {
		self.require_vote(overlay, PluginKind::ControlVariant, None)?;
		let command = self.factory.configure_variants(
			&self.tree,
			&self.variants,
			&self.overlays,
			overlay,
			changes,
		)?;
		self.emit(command);
		Ok(())
	}

	/// Starts renaming the current variant of the scope `overlay` manages.
	pub fn start_variant_rename(&mut self, overlay: OverlayId) -> Result<RenameTicket, RenameError> {
		if !self.overlays.contains(overlay) {
			return Err(RenameError::TargetGone);
		}
		let scope = self
			.variant_actions()
			.managed_scope(overlay)
			.filter(|_| self.is_editable_by(overlay, PluginKind::ControlVariant, None))
			.ok_or(RenameError::NotVariantManagement)?;
		let key = self.variants.current(&scope)?;
		let ticket = self.rename.start(overlay, scope, key)?;
		self.events.push(AuthoringEvent::RenameStarted(overlay));
		Ok(ticket)
	}

	/// Ends the rename of `ticket` with the confirmed title, or the error the
	/// confirmation produced.
	///
	/// Returns `Ok(false)` when the trimmed title equals the current one. A
	/// title already used by another visible variant of the scope sets the
	/// overlay's error state and fails with
	/// [`RenameError::DuplicateTitle`]. Hidden variants do not count.
	pub fn finish_variant_rename(
		&mut self,
		ticket: RenameTicket,
		outcome: Result<String, RenameError>,
	) -> Result<bool, RenameError> {
		self.rename.finish(&ticket)?;
		let overlay = ticket.overlay();
		self.events.push(AuthoringEvent::RenameEnded(overlay));
		let title = outcome?;

		let element = self
			.overlays
			.element(overlay)
			.cloned()
			.ok_or(RenameError::TargetGone)?;
		if !self.tree.contains(&element) {
			return Err(RenameError::TargetGone);
		}
		let title = title.trim();
		if title.is_empty() {
			self.set_error_state(overlay, true);
			return Err(RenameError::Rejected("title must not be empty".to_owned()));
		}
		let scope = ticket.scope();
		let entry = self.variants.entry(scope, ticket.key())?;
		if entry.title == title {
			self.set_error_state(overlay, false);
			return Ok(false);
		}
		let taken = self
			.variants
			.variants(scope)?
			.iter()
			.any(|v| v.key != entry.key && v.visible && v.title == title);
		if taken {
			self.set_error_state(overlay, true);
			warn!(%scope, title, "variant title already in use");
			return Err(DuplicateTitleError {
				title: title.to_owned(),
			}
			.into());
		}
		self.set_error_state(overlay, false);
		let command = self.factory.set_variant_title(
			&self.tree,
			&self.variants,
			&self.overlays,
			overlay,
			entry.key,
			title.to_owned(),
		)?;
		self.emit(command);
		Ok(true)
	}

	/// Runs the whole rename gesture: start, confirm, finish.
	pub async fn rename_variant<Val>(
		&mut self,
		overlay: OverlayId,
		validator: &Val,
		title: String,
	) -> Result<bool, RenameError>
	where
		Val: TitleValidator + ?Sized,
	{
		let ticket = self.start_variant_rename(overlay)?;
		let outcome = ticket.confirm(validator, title).await;
		self.finish_variant_rename(ticket, outcome)
	}

	/// Cancels the pending variant rename, if any.
	pub fn cancel_variant_rename(&mut self) -> bool {
		match self.rename.cancel() {
			Some(overlay) => {
				self.events.push(AuthoringEvent::RenameEnded(overlay));
				true
			}
			None => false,
		}
	}

	fn set_error_state(&mut self, overlay: OverlayId, error: bool) {
		if let Some(o) = self.overlays.get_mut(overlay) {
			o.set_error_state(error);
		}
	}
}

impl<T, V> std::fmt::Debug for AuthoringSession<T, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthoringSession")
			.field("config", &self.config)
			.field("overlays", &self.overlays.len())
			.field("history", &self.stack.len())
			.field("pending_events", &self.events.len())
			.finish_non_exhaustive()
	}
}
