//! Commands: reversible units of authored mutation.
//!
//! A [`Command`] is built by the [`CommandFactory`], prepared against the
//! current tree, then executed and recorded by the [`CommandStack`].
//! Preparing compiles the command into a list of primitive [`Step`]s that
//! each know their own inverse. Execution applies them in order and undo
//! reverts them in reverse order. A step that fails rolls back the steps
//! already applied, so a command is all-or-nothing.

use rta_primitives::{
	AggregationName, ChangeKind, ControlType, ElementId, ElementPosition, ElementTree,
	PropertyValue, VariantEntry, VariantKey, VariantModel, VariantScopeId,
};
use tracing::trace;

use crate::error::{ExecuteError, PrepareError};

mod factory;
pub mod stack;
mod step;

pub use factory::CommandFactory;
pub use stack::CommandStack;
pub use step::{CommandEffect, Direction, Step};

/// Mutable access to the host state a command operates on.
pub struct CommandContext<'a> {
	pub tree: &'a mut dyn ElementTree,
	pub variants: &'a mut dyn VariantModel,
}

impl<'a> CommandContext<'a> {
	pub fn new(tree: &'a mut dyn ElementTree, variants: &'a mut dyn VariantModel) -> Self {
		Self { tree, variants }
	}
}

/// Bookkeeping shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMeta {
	pub change_type: ChangeKind,
	/// Element the gesture targeted.
	pub element: ElementId,
	/// Element the change is recorded against.
	pub selector: ElementId,
	/// The command changes runtime state only and is never persisted.
	pub runtime_only: bool,
	/// Variant-management scope the change belongs to.
	pub variant_reference: Option<VariantScopeId>,
}

impl CommandMeta {
	pub fn new(change_type: impl Into<ChangeKind>, element: ElementId) -> Self {
		Self {
			change_type: change_type.into(),
			selector: element.clone(),
			element,
			runtime_only: false,
			variant_reference: None,
		}
	}
}

/// Title and visibility edits for one variant of a configure command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantConfiguration {
	pub key: VariantKey,
	pub title: Option<String>,
	pub visible: Option<bool>,
}

impl VariantConfiguration {
	pub fn new(key: impl Into<VariantKey>) -> Self {
		Self {
			key: key.into(),
			title: None,
			visible: None,
		}
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn visible(mut self, visible: bool) -> Self {
		self.visible = Some(visible);
		self
	}
}

/// The closed set of commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
	Rename {
		property: Box<str>,
		value: PropertyValue,
	},
	Move {
		source: ElementPosition,
		/// Index counted after removal from `source`.
		target: ElementPosition,
	},
	/// Hides the element.
	Remove,
	CreateContainer {
		parent: ElementId,
		aggregation: AggregationName,
		index: usize,
		container: ElementId,
		control_type: ControlType,
		title: Option<String>,
	},
	SwitchVariant {
		scope: VariantScopeId,
		to: VariantKey,
	},
	DuplicateVariant {
		scope: VariantScopeId,
		source: VariantKey,
		new_key: VariantKey,
		title: String,
	},
	SetTitle {
		scope: VariantScopeId,
		key: VariantKey,
		title: String,
	},
	ConfigureVariants {
		scope: VariantScopeId,
		changes: Vec<VariantConfiguration>,
	},
}

impl CommandKind {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Rename { .. } => "rename",
			Self::Move { .. } => "move",
			Self::Remove => "remove",
			Self::CreateContainer { .. } => "createContainer",
			Self::SwitchVariant { .. } => "switchVariant",
			Self::DuplicateVariant { .. } => "duplicateVariant",
			Self::SetTitle { .. } => "setTitle",
			Self::ConfigureVariants { .. } => "configureVariants",
		}
	}
}

/// A reversible unit of authored mutation.
#[derive(Debug, Clone)]
pub struct Command {
	meta: CommandMeta,
	kind: CommandKind,
	steps: Vec<Step>,
	prepared: bool,
}

impl Command {
	pub fn new(meta: CommandMeta, kind: CommandKind) -> Self {
		Self {
			meta,
			kind,
			steps: Vec::new(),
			prepared: false,
		}
	}

	pub fn name(&self) -> &'static str {
		self.kind.name()
	}

	pub fn meta(&self) -> &CommandMeta {
		&self.meta
	}

	pub fn kind(&self) -> &CommandKind {
		&self.kind
	}

	pub fn element(&self) -> &ElementId {
		&self.meta.element
	}

	pub fn is_prepared(&self) -> bool {
		self.prepared
	}

	pub fn is_runtime_only(&self) -> bool {
		self.meta.runtime_only
	}

	/// Primitive steps, in execution order. Empty until prepared.
	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	/// Validates the command against the current state and compiles it into
	/// steps. Nothing is mutated.
	pub fn prepare(
		&mut self,
		tree: &dyn ElementTree,
		variants: &dyn VariantModel,
	) -> Result<(), PrepareError> {
		let element = &self.meta.element;
		let steps = match &self.kind {
			CommandKind::Rename { property, value } => {
				require(tree, element)?;
				let previous = tree.property(element, property)?;
				if &previous == value {
					return Err(PrepareError::NothingToChange(element.clone()));
				}
				vec![Step::SetProperty {
					element: element.clone(),
					name: property.clone(),
					value: value.clone(),
					previous,
				}]
			}
			CommandKind::Remove => {
				require(tree, element)?;
				let previous = tree.property(element, "visible")?;
				if previous.as_bool() == Some(false) {
					return Err(PrepareError::NothingToChange(element.clone()));
				}
				vec![Step::SetProperty {
					element: element.clone(),
					name: "visible".into(),
					value: PropertyValue::Bool(false),
					previous,
				}]
			}
			CommandKind::Move { source, target } => {
				require(tree, element)?;
				if tree.position(element).as_ref() != Some(source) {
					return Err(PrepareError::Invalid(format!(
						"{element} is no longer at its source position"
					)));
				}
				require(tree, &target.parent)?;
				let same = source.parent == target.parent && source.aggregation == target.aggregation;
				let mut len = tree.aggregation(&target.parent, &target.aggregation)?.len();
				if same {
					len -= 1;
					if source.index == target.index {
						return Err(PrepareError::NothingToChange(element.clone()));
					}
				}
				if target.index > len {
					return Err(PrepareError::Invalid(format!(
						"target index {} out of range (len {len})",
						target.index
					)));
				}
				vec![
					Step::Remove {
						parent: source.parent.clone(),
						aggregation: source.aggregation.clone(),
						child: element.clone(),
						index: source.index,
					},
					Step::Insert {
						parent: target.parent.clone(),
						aggregation: target.aggregation.clone(),
						index: target.index,
						child: element.clone(),
					},
				]
			}
			CommandKind::CreateContainer {
				parent,
				aggregation,
				index,
				container,
				control_type,
				title,
			} => {
				require(tree, parent)?;
				if tree.contains(container) {
					return Err(PrepareError::Invalid(format!("{container} already exists")));
				}
				let len = tree.aggregation(parent, aggregation)?.len();
				if *index > len {
					return Err(PrepareError::Invalid(format!(
						"insert index {index} out of range (len {len})"
					)));
				}
				let mut steps = vec![
					Step::Create {
						element: container.clone(),
						control_type: control_type.clone(),
					},
					Step::Insert {
						parent: parent.clone(),
						aggregation: aggregation.clone(),
						index: *index,
						child: container.clone(),
					},
				];
				if let Some(title) = title {
					steps.push(Step::SetProperty {
						element: container.clone(),
						name: "title".into(),
						value: PropertyValue::Text(title.clone()),
						previous: PropertyValue::Unset,
					});
				}
				steps
			}
			CommandKind::SwitchVariant { scope, to } => {
				variants.entry(scope, to)?;
				let from = variants.current(scope)?;
				if &from == to {
					return Err(PrepareError::NothingToChange(element.clone()));
				}
				vec![Step::SwitchVariant {
					scope: scope.clone(),
					to: to.clone(),
					from,
				}]
			}
			CommandKind::DuplicateVariant {
				scope,
				source,
				new_key,
				title,
			} => {
				variants.entry(scope, source)?;
				if variants.entry(scope, new_key).is_ok() {
					return Err(PrepareError::Invalid(format!("variant {new_key} already exists")));
				}
				let from = variants.current(scope)?;
				vec![
					Step::InsertVariant {
						scope: scope.clone(),
						entry: VariantEntry::new(new_key.clone(), title.clone()),
					},
					Step::SwitchVariant {
						scope: scope.clone(),
						to: new_key.clone(),
						from,
					},
				]
			}
			CommandKind::SetTitle { scope, key, title } => {
				let entry = variants.entry(scope, key)?;
				if &entry.title == title {
					return Err(PrepareError::NothingToChange(element.clone()));
				}
				vec![Step::SetVariantTitle {
					scope: scope.clone(),
					key: key.clone(),
					title: title.clone(),
					previous: entry.title,
				}]
			}
			CommandKind::ConfigureVariants { scope, changes } => {
				let current = variants.current(scope)?;
				let mut steps = Vec::new();
				for change in changes {
					let entry = variants.entry(scope, &change.key)?;
					if let Some(title) = &change.title
						&& *title != entry.title
					{
						steps.push(Step::SetVariantTitle {
							scope: scope.clone(),
							key: change.key.clone(),
							title: title.clone(),
							previous: entry.title.clone(),
						});
					}
					if let Some(visible) = change.visible
						&& visible != entry.visible
					{
						if !visible && change.key == current {
							return Err(PrepareError::Invalid(format!(
								"cannot hide the current variant {current}"
							)));
						}
						steps.push(Step::SetVariantVisible {
							scope: scope.clone(),
							key: change.key.clone(),
							visible,
							previous: entry.visible,
						});
					}
				}
				if steps.is_empty() {
					return Err(PrepareError::NothingToChange(element.clone()));
				}
				steps
			}
		};
		trace!(command = self.name(), element = %self.meta.element, steps = steps.len(), "command prepared");
		self.steps = steps;
		self.prepared = true;
		Ok(())
	}

	/// Returns `true` if running the command now would change anything.
	///
	/// Pure: reads state, mutates nothing. Not a substitute for
	/// [`prepare`](Self::prepare).
	pub fn is_enabled(&self, tree: &dyn ElementTree, variants: &dyn VariantModel) -> bool {
		let element = &self.meta.element;
		match &self.kind {
			CommandKind::Rename { property, value } => tree
				.property(element, property)
				.is_ok_and(|current| &current != value),
			CommandKind::Remove => tree
				.property(element, "visible")
				.is_ok_and(|v| v.as_bool() != Some(false)),
			CommandKind::Move { source, target } => {
				source != target && tree.position(element).as_ref() == Some(source)
			}
			CommandKind::CreateContainer {
				parent, container, ..
			} => tree.contains(parent) && !tree.contains(container),
			CommandKind::SwitchVariant { scope, to } => {
				variants.current(scope).is_ok_and(|current| &current != to)
			}
			CommandKind::DuplicateVariant { scope, source, .. } => {
				variants.entry(scope, source).is_ok()
			}
			CommandKind::SetTitle { scope, key, title } => variants
				.entry(scope, key)
				.is_ok_and(|e| &e.title != title),
			CommandKind::ConfigureVariants { changes, .. } => !changes.is_empty(),
		}
	}

	/// Applies the prepared steps. On error the state is rolled back unless
	/// the error is [`ExecuteError::RollbackFailed`].
	pub fn execute(&mut self, cx: &mut CommandContext<'_>) -> Result<(), ExecuteError> {
		step::run_forward(&mut self.steps, cx)
	}

	/// Reverts the steps applied by the last execute.
	pub fn undo(&mut self, cx: &mut CommandContext<'_>) -> Result<(), ExecuteError> {
		step::run_backward(&mut self.steps, cx)
	}

	/// Structural effects of running the command in `direction`, in the order
	/// they happened.
	pub fn effects(&self, direction: Direction) -> Vec<CommandEffect> {
		match direction {
			Direction::Execute => self.steps.iter().map(|s| s.effect(direction)).collect(),
			Direction::Undo => self.steps.iter().rev().map(|s| s.effect(direction)).collect(),
		}
	}
}

fn require(tree: &dyn ElementTree, element: &ElementId) -> Result<(), PrepareError> {
	if tree.contains(element) {
		Ok(())
	} else {
		Err(PrepareError::ElementMissing(element.clone()))
	}
}

#[cfg(test)]
mod tests;
