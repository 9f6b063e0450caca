use pretty_assertions::assert_eq;
use rta_primitives::{MemoryTree, MemoryVariantModel, TreeError, VariantError};

use super::*;
use crate::error::StackError;
use crate::event::ElementMutation;
use crate::fixture::{self, id};

/// Delegates to a [`MemoryTree`] but rejects inserts into one parent.
struct FailingTree {
	inner: MemoryTree,
	reject_inserts_into: Option<ElementId>,
}

impl FailingTree {
	fn new(inner: MemoryTree) -> Self {
		Self {
			inner,
			reject_inserts_into: None,
		}
	}
}

impl ElementTree for FailingTree {
	fn contains(&self, id: &ElementId) -> bool {
		self.inner.contains(id)
	}

	fn control_type(&self, id: &ElementId) -> Option<ControlType> {
		self.inner.control_type(id)
	}

	fn has_generated_id(&self, id: &ElementId) -> bool {
		self.inner.has_generated_id(id)
	}

	fn position(&self, id: &ElementId) -> Option<ElementPosition> {
		self.inner.position(id)
	}

	fn aggregation_names(&self, id: &ElementId) -> Vec<AggregationName> {
		self.inner.aggregation_names(id)
	}

	fn aggregation(&self, id: &ElementId, aggregation: &AggregationName) -> Result<Vec<ElementId>, TreeError> {
		self.inner.aggregation(id, aggregation)
	}

	fn association(&self, id: &ElementId, name: &str) -> Vec<ElementId> {
		self.inner.association(id, name)
	}

	fn property(&self, id: &ElementId, name: &str) -> Result<PropertyValue, TreeError> {
		self.inner.property(id, name)
	}

	fn set_property(&mut self, id: &ElementId, name: &str, value: PropertyValue) -> Result<PropertyValue, TreeError> {
		self.inner.set_property(id, name, value)
	}

	fn insert(
		&mut self,
		parent: &ElementId,
		aggregation: &AggregationName,
		index: usize,
		child: &ElementId,
	) -> Result<(), TreeError> {
		if self.reject_inserts_into.as_ref() == Some(parent) {
			return Err(TreeError::Rejected {
				element: parent.clone(),
				reason: "locked".to_owned(),
			});
		}
		self.inner.insert(parent, aggregation, index, child)
	}

	fn remove(&mut self, parent: &ElementId, aggregation: &AggregationName, child: &ElementId) -> Result<usize, TreeError> {
		self.inner.remove(parent, aggregation, child)
	}

	fn create(&mut self, id: &ElementId, control_type: &ControlType) -> Result<(), TreeError> {
		self.inner.create(id, control_type)
	}

	fn destroy(&mut self, id: &ElementId) -> Result<(), TreeError> {
		self.inner.destroy(id)
	}
}

fn content(tree: &dyn ElementTree, parent: &str) -> Vec<ElementId> {
	tree.aggregation(&id(parent), &"content".into()).unwrap()
}

fn ids(names: &[&str]) -> Vec<ElementId> {
	names.iter().map(|n| id(n)).collect()
}

fn rename(element: &str, property: &str, value: &str) -> Command {
	Command::new(
		CommandMeta::new("rename", id(element)),
		CommandKind::Rename {
			property: property.into(),
			value: value.into(),
		},
	)
}

fn move_label(to_parent: &str, index: usize) -> Command {
	Command::new(
		CommandMeta::new("moveControls", id("label")),
		CommandKind::Move {
			source: ElementPosition::new("section", "content", 0),
			target: ElementPosition::new(to_parent, "content", index),
		},
	)
}

fn variant_command(kind: CommandKind) -> Command {
	Command::new(CommandMeta::new("variant", id("vm")), kind)
}

#[test]
fn rename_executes_and_undoes() {
	let mut tree = fixture::tree();
	let mut variants = fixture::variants();
	let mut cmd = rename("label", "text", "Full name");
	cmd.prepare(&tree, &variants).unwrap();
	assert!(cmd.is_prepared());

	let mut cx = CommandContext::new(&mut tree, &mut variants);
	cmd.execute(&mut cx).unwrap();
	assert_eq!(tree.property(&id("label"), "text"), Ok("Full name".into()));

	let mut cx = CommandContext::new(&mut tree, &mut variants);
	cmd.undo(&mut cx).unwrap();
	assert_eq!(tree.property(&id("label"), "text"), Ok("Name".into()));
}

#[test]
fn rename_to_same_value_changes_nothing() {
	let tree = fixture::tree();
	let mut cmd = rename("label", "text", "Name");
	assert!(!cmd.is_enabled(&tree, &fixture::variants()));
	assert_eq!(
		cmd.prepare(&tree, &fixture::variants()),
		Err(PrepareError::NothingToChange(id("label")))
	);
	assert!(!cmd.is_prepared());
}

#[test]
fn prepare_rejects_missing_element() {
	let mut cmd = rename("ghost", "text", "Boo");
	assert_eq!(
		cmd.prepare(&fixture::tree(), &fixture::variants()),
		Err(PrepareError::ElementMissing(id("ghost")))
	);
}

#[test]
fn remove_hides_once() {
	let mut tree = fixture::tree();
	let mut variants = fixture::variants();
	let mut cmd = Command::new(CommandMeta::new("hideControl", id("field")), CommandKind::Remove);
	cmd.prepare(&tree, &variants).unwrap();
	cmd.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(tree.property(&id("field"), "visible"), Ok(false.into()));

	let mut again = Command::new(CommandMeta::new("hideControl", id("field")), CommandKind::Remove);
	assert_eq!(
		again.prepare(&tree, &variants),
		Err(PrepareError::NothingToChange(id("field")))
	);

	cmd.undo(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(tree.property(&id("field"), "visible"), Ok(PropertyValue::Unset));
}

#[test]
fn move_within_aggregation_uses_post_removal_index() {
	let mut tree = fixture::tree();
	let mut variants = fixture::variants();
	let mut cmd = move_label("section", 2);
	cmd.prepare(&tree, &variants).unwrap();
	cmd.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(content(&tree, "section"), ids(&["field", "__label1", "label"]));

	cmd.undo(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(content(&tree, "section"), ids(&["label", "field", "__label1"]));
}

#[test]
fn move_rejects_out_of_range_target() {
	let mut cmd = move_label("target", 1);
	assert!(matches!(
		cmd.prepare(&fixture::tree(), &fixture::variants()),
		Err(PrepareError::Invalid(_))
	));
}

#[test]
fn move_rejects_stale_source() {
	let mut tree = fixture::tree();
	tree.remove(&id("section"), &"content".into(), &id("label"))
		.unwrap();
	tree.insert(&id("section"), &"content".into(), 1, &id("label"))
		.unwrap();
	let mut cmd = move_label("target", 0);
	assert!(matches!(
		cmd.prepare(&tree, &fixture::variants()),
		Err(PrepareError::Invalid(_))
	));
}

#[test]
fn failed_insert_rolls_back_the_removal() {
	let mut tree = FailingTree::new(fixture::tree());
	tree.reject_inserts_into = Some(id("target"));
	let mut variants = fixture::variants();
	let mut cmd = move_label("target", 0);
	cmd.prepare(&tree, &variants).unwrap();

	let err = cmd
		.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap_err();
	assert!(matches!(err, ExecuteError::Tree(TreeError::Rejected { .. })));
	assert!(!err.is_corrupting());
	assert_eq!(content(&tree, "section"), ids(&["label", "field", "__label1"]));
	assert_eq!(content(&tree, "target"), Vec::<ElementId>::new());
}

#[test]
fn failed_rollback_is_reported() {
	let mut tree = FailingTree::new(fixture::tree());
	let mut variants = fixture::variants();
	let mut cmd = move_label("section", 1);
	cmd.prepare(&tree, &variants).unwrap();
	tree.reject_inserts_into = Some(id("section"));

	let err = cmd
		.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap_err();
	assert!(err.is_corrupting());
	assert_eq!(tree.inner.position(&id("label")), None);
}

#[test]
fn failed_rollback_on_push_halts_the_stack() {
	let mut tree = FailingTree::new(fixture::tree());
	let mut variants = fixture::variants();
	let mut stack = CommandStack::new();
	let mut cmd = move_label("section", 1);
	cmd.prepare(&tree, &variants).unwrap();
	tree.reject_inserts_into = Some(id("section"));

	let err = stack
		.push(cmd, &mut CommandContext::new(&mut tree, &mut variants))
		.unwrap_err();
	assert!(matches!(
		err,
		StackError::Execute(ExecuteError::RollbackFailed { .. })
	));
	assert!(stack.is_halted());
	assert!(stack.is_empty());
	assert_eq!(
		stack
			.undo(&mut CommandContext::new(&mut tree, &mut variants))
			.unwrap_err(),
		StackError::Halted
	);
}

#[test]
fn failed_undo_reapplies_reverted_steps() {
	let mut tree = FailingTree::new(fixture::tree());
	let mut variants = fixture::variants();
	let mut cmd = move_label("target", 0);
	cmd.prepare(&tree, &variants).unwrap();
	cmd.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();

	tree.reject_inserts_into = Some(id("section"));
	let err = cmd
		.undo(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap_err();
	assert!(matches!(err, ExecuteError::Tree(TreeError::Rejected { .. })));
	assert_eq!(content(&tree, "target"), ids(&["label"]));
	assert_eq!(content(&tree, "section"), ids(&["field", "__label1"]));
}

#[test]
fn create_container_undo_destroys_it() {
	let mut tree = fixture::tree();
	let mut variants = fixture::variants();
	let mut cmd = Command::new(
		CommandMeta::new("addGroup", id("page")),
		CommandKind::CreateContainer {
			parent: id("page"),
			aggregation: "content".into(),
			index: 1,
			container: id("group"),
			control_type: "Section".into(),
			title: Some("Group".to_owned()),
		},
	);
	cmd.prepare(&tree, &variants).unwrap();
	assert_eq!(cmd.steps().len(), 3);
	cmd.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(content(&tree, "page")[1], id("group"));
	assert_eq!(tree.property(&id("group"), "title"), Ok("Group".into()));

	cmd.undo(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert!(!tree.contains(&id("group")));
	assert_eq!(content(&tree, "page"), ids(&["vm", "section", "target", "box"]));
}

#[test]
fn effects_are_inverted_on_undo() {
	let tree = fixture::tree();
	let mut cmd = move_label("target", 0);
	cmd.prepare(&tree, &fixture::variants()).unwrap();
	let removed = CommandEffect::Mutation {
		owner: id("section"),
		mutation: ElementMutation::RemoveAggregation {
			aggregation: "content".into(),
			child: id("label"),
		},
	};
	let inserted = CommandEffect::Mutation {
		owner: id("target"),
		mutation: ElementMutation::InsertAggregation {
			aggregation: "content".into(),
			child: id("label"),
		},
	};
	assert_eq!(cmd.effects(Direction::Execute), vec![removed, inserted]);

	let restored = CommandEffect::Mutation {
		owner: id("section"),
		mutation: ElementMutation::InsertAggregation {
			aggregation: "content".into(),
			child: id("label"),
		},
	};
	let vacated = CommandEffect::Mutation {
		owner: id("target"),
		mutation: ElementMutation::RemoveAggregation {
			aggregation: "content".into(),
			child: id("label"),
		},
	};
	assert_eq!(cmd.effects(Direction::Undo), vec![vacated, restored]);
}

#[test]
fn switch_to_current_changes_nothing() {
	let mut cmd = variant_command(CommandKind::SwitchVariant {
		scope: "vm".into(),
		to: "standard".into(),
	});
	let variants = fixture::variants();
	assert!(!cmd.is_enabled(&fixture::tree(), &variants));
	assert_eq!(
		cmd.prepare(&fixture::tree(), &variants),
		Err(PrepareError::NothingToChange(id("vm")))
	);
}

#[test]
fn duplicate_switches_back_before_removing() {
	let mut tree = fixture::tree();
	let mut variants = fixture::variants();
	let mut cmd = variant_command(CommandKind::DuplicateVariant {
		scope: "vm".into(),
		source: "standard".into(),
		new_key: "copy".into(),
		title: "Standard Copy".to_owned(),
	});
	cmd.prepare(&tree, &variants).unwrap();
	cmd.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	let scope = VariantScopeId::new("vm");
	assert_eq!(variants.current(&scope), Ok("copy".into()));
	assert_eq!(variants.entry(&scope, &"copy".into()).unwrap().title, "Standard Copy");

	cmd.undo(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(variants.current(&scope), Ok("standard".into()));
	assert!(matches!(
		variants.entry(&scope, &"copy".into()),
		Err(VariantError::UnknownVariant { .. })
	));
}

#[test]
fn configure_cannot_hide_current_variant() {
	let mut cmd = variant_command(CommandKind::ConfigureVariants {
		scope: "vm".into(),
		changes: vec![VariantConfiguration::new("standard").visible(false)],
	});
	assert!(matches!(
		cmd.prepare(&fixture::tree(), &fixture::variants()),
		Err(PrepareError::Invalid(_))
	));
}

#[test]
fn configure_applies_and_reverts_all_edits() {
	let mut tree = fixture::tree();
	let mut variants = fixture::variants();
	let before: MemoryVariantModel = variants.clone();
	let scope = VariantScopeId::new("vm");
	let mut cmd = variant_command(CommandKind::ConfigureVariants {
		scope: scope.clone(),
		changes: vec![
			VariantConfiguration::new("compact").title("Dense").visible(false),
			VariantConfiguration::new("legacy").visible(true),
			// Unchanged entries contribute no step.
			VariantConfiguration::new("standard").title("Standard"),
		],
	});
	cmd.prepare(&tree, &variants).unwrap();
	assert_eq!(cmd.steps().len(), 3);
	cmd.execute(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	let compact = variants.entry(&scope, &"compact".into()).unwrap();
	assert_eq!((compact.title.as_str(), compact.visible), ("Dense", false));
	assert!(variants.entry(&scope, &"legacy".into()).unwrap().visible);

	cmd.undo(&mut CommandContext::new(&mut tree, &mut variants))
		.unwrap();
	assert_eq!(variants.variants(&scope), before.variants(&scope));
}

#[test]
fn is_enabled_does_not_mutate() {
	let tree = fixture::tree();
	let variants = fixture::variants();
	let cmd = rename("label", "text", "Other");
	assert!(cmd.is_enabled(&tree, &variants));
	assert!(cmd.is_enabled(&tree, &variants));
	assert_eq!(tree.property(&id("label"), "text"), Ok("Name".into()));
	assert!(cmd.steps().is_empty());
}
