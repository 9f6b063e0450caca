//! Primitive reversible steps and the all-or-nothing runner.
//!
//! Rollback order: when step `i` fails during execute, steps `0..i` are
//! reverted newest first. When step `i` fails during undo, the steps after
//! it that were already reverted are re-applied oldest first, leaving the
//! state as it was after execute.

use rta_primitives::{
	AggregationName, ControlType, ElementId, PropertyValue, VariantEntry, VariantKey,
	VariantScopeId,
};
use tracing::warn;

use super::CommandContext;
use crate::error::ExecuteError;
use crate::event::ElementMutation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	SetProperty {
		element: ElementId,
		name: Box<str>,
		value: PropertyValue,
		previous: PropertyValue,
	},
	Remove {
		parent: ElementId,
		aggregation: AggregationName,
		child: ElementId,
		index: usize,
	},
	Insert {
		parent: ElementId,
		aggregation: AggregationName,
		index: usize,
		child: ElementId,
	},
	Create {
		element: ElementId,
		control_type: ControlType,
	},
	SwitchVariant {
		scope: VariantScopeId,
		to: VariantKey,
		from: VariantKey,
	},
	InsertVariant {
		scope: VariantScopeId,
		entry: VariantEntry,
	},
	SetVariantTitle {
		scope: VariantScopeId,
		key: VariantKey,
		title: String,
		previous: String,
	},
	SetVariantVisible {
		scope: VariantScopeId,
		key: VariantKey,
		visible: bool,
		previous: bool,
	},
}

/// Which way a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Execute or redo.
	Execute,
	Undo,
}

/// Observable outcome of one step, fed back into overlay bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEffect {
	/// `owner` changed as described.
	Mutation {
		owner: ElementId,
		mutation: ElementMutation,
	},
	Created(ElementId),
	Destroyed(ElementId),
	VariantsChanged(VariantScopeId),
}

impl Step {
	pub(crate) fn apply(&mut self, cx: &mut CommandContext<'_>) -> Result<(), ExecuteError> {
		match self {
			Self::SetProperty {
				element,
				name,
				value,
				previous,
			} => *previous = cx.tree.set_property(element, name, value.clone())?,
			Self::Remove {
				parent,
				aggregation,
				child,
				index,
			} => *index = cx.tree.remove(parent, aggregation, child)?,
			Self::Insert {
				parent,
				aggregation,
				index,
				child,
			} => cx.tree.insert(parent, aggregation, *index, child)?,
			Self::Create {
				element,
				control_type,
			} => cx.tree.create(element, control_type)?,
			Self::SwitchVariant { scope, to, from } => *from = cx.variants.switch(scope, to)?,
			Self::InsertVariant { scope, entry } => cx.variants.insert(scope, entry.clone())?,
			Self::SetVariantTitle {
				scope,
				key,
				title,
				previous,
			} => *previous = cx.variants.set_title(scope, key, title)?,
			Self::SetVariantVisible {
				scope,
				key,
				visible,
				previous,
			} => *previous = cx.variants.set_visible(scope, key, *visible)?,
		}
		Ok(())
	}

	pub(crate) fn revert(&self, cx: &mut CommandContext<'_>) -> Result<(), ExecuteError> {
		match self {
			Self::SetProperty {
				element,
				name,
				previous,
				..
			} => {
				cx.tree.set_property(element, name, previous.clone())?;
			}
			Self::Remove {
				parent,
				aggregation,
				child,
				index,
			} => cx.tree.insert(parent, aggregation, *index, child)?,
			Self::Insert {
				parent,
				aggregation,
				child,
				..
			} => {
				cx.tree.remove(parent, aggregation, child)?;
			}
			Self::Create { element, .. } => cx.tree.destroy(element)?,
			Self::SwitchVariant { scope, from, .. } => {
				cx.variants.switch(scope, from)?;
			}
			Self::InsertVariant { scope, entry } => {
				cx.variants.remove(scope, &entry.key)?;
			}
			Self::SetVariantTitle {
				scope,
				key,
				previous,
				..
			} => {
				cx.variants.set_title(scope, key, previous)?;
			}
			Self::SetVariantVisible {
				scope,
				key,
				previous,
				..
			} => {
				cx.variants.set_visible(scope, key, *previous)?;
			}
		}
		Ok(())
	}

	pub fn effect(&self, direction: Direction) -> CommandEffect {
		let forward = direction == Direction::Execute;
		match self {
			Self::SetProperty { element, name, .. } => CommandEffect::Mutation {
				owner: element.clone(),
				mutation: ElementMutation::property(name),
			},
			Self::Remove {
				parent,
				aggregation,
				child,
				..
			}
			| Self::Insert {
				parent,
				aggregation,
				child,
				..
			} => {
				let removes = matches!(self, Self::Remove { .. }) == forward;
				let aggregation = aggregation.clone();
				let child = child.clone();
				CommandEffect::Mutation {
					owner: parent.clone(),
					mutation: if removes {
						ElementMutation::RemoveAggregation { aggregation, child }
					} else {
						ElementMutation::InsertAggregation { aggregation, child }
					},
				}
			}
			Self::Create { element, .. } if forward => CommandEffect::Created(element.clone()),
			Self::Create { element, .. } => CommandEffect::Destroyed(element.clone()),
			Self::SwitchVariant { scope, .. }
			| Self::InsertVariant { scope, .. }
			| Self::SetVariantTitle { scope, .. }
			| Self::SetVariantVisible { scope, .. } => CommandEffect::VariantsChanged(scope.clone()),
		}
	}
}

pub(super) fn run_forward(steps: &mut [Step], cx: &mut CommandContext<'_>) -> Result<(), ExecuteError> {
	for i in 0..steps.len() {
		let Err(cause) = steps[i].apply(cx) else {
			continue;
		};
		warn!(step = i, error = %cause, "step failed, rolling back");
		for done in steps[..i].iter().rev() {
			if let Err(rollback) = done.revert(cx) {
				return Err(ExecuteError::RollbackFailed {
					cause: Box::new(cause),
					rollback: Box::new(rollback),
				});
			}
		}
		return Err(cause);
	}
	Ok(())
}

pub(super) fn run_backward(steps: &mut [Step], cx: &mut CommandContext<'_>) -> Result<(), ExecuteError> {
	for i in (0..steps.len()).rev() {
		let Err(cause) = steps[i].revert(cx) else {
			continue;
		};
		warn!(step = i, error = %cause, "revert failed, re-applying");
		for done in &mut steps[i + 1..] {
			if let Err(rollback) = done.apply(cx) {
				return Err(ExecuteError::RollbackFailed {
					cause: Box::new(cause),
					rollback: Box::new(rollback),
				});
			}
		}
		return Err(cause);
	}
	Ok(())
}
