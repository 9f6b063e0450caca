//! A two-group form shared by the scenario tests.
//!
//! ```text
//! form (Form).content
//! ├── vm (VariantManagement)    for → [p]
//! ├── p (Group).content
//! │   ├── e1 (Text)  text = "X"
//! │   └── e2 (Text)
//! ├── q (Group).content         (empty)
//! └── locked (Panel).content
//!     └── e3 (Text)
//! ```

use std::sync::Arc;

use rta_editor::{AuthoringConfig, AuthoringSession, OverlayId};
use rta_primitives::{
	ElementId, ElementTree, MemoryTree, MemoryVariantModel, PropertyValue, VariantEntry,
	VariantScopeId,
};
use rta_registry::{
	Action, ActionDescriptor, CapabilityDescriptor, ChangeRegistry, DesignTimeMetadata,
	DesignTimeRegistry, LayerSet,
};

pub type Session = AuthoringSession<MemoryTree, MemoryVariantModel>;

pub fn id(s: &str) -> ElementId {
	ElementId::new(s)
}

pub fn tree() -> MemoryTree {
	let mut tree = MemoryTree::new();
	let form = tree.add_root("form", "Form").unwrap();
	let vm = tree.add_child(&form, "content", "vm", "VariantManagement").unwrap();
	let p = tree.add_child(&form, "content", "p", "Group").unwrap();
	let e1 = tree.add_child(&p, "content", "e1", "Text").unwrap();
	tree.add_child(&p, "content", "e2", "Text").unwrap();
	let q = tree.add_child(&form, "content", "q", "Group").unwrap();
	tree.declare_aggregation(&q, "content").unwrap();
	let locked = tree.add_child(&form, "content", "locked", "Panel").unwrap();
	tree.add_child(&locked, "content", "e3", "Text").unwrap();
	tree.set_association(&vm, "for", vec![p]).unwrap();
	tree.set_property(&e1, "text", PropertyValue::from("X")).unwrap();
	tree
}

pub fn variants() -> MemoryVariantModel {
	let mut variants = MemoryVariantModel::new();
	variants
		.add_scope(
			"vm",
			vec![
				VariantEntry::new("default", "Default"),
				VariantEntry::new("wide", "Wide"),
				VariantEntry::new("archived", "Archived").hidden(),
			],
		)
		.unwrap();
	variants
}

pub fn session() -> Session {
	let mut changes = ChangeRegistry::builder();
	for (control, change) in [
		("Form", "moveControls"),
		("Group", "moveControls"),
		("Text", "rename"),
		("Text", "hideControl"),
	] {
		changes
			.register(control, change, LayerSet::ADAPTATION, CapabilityDescriptor::revertible())
			.unwrap();
	}

	let movable = || {
		DesignTimeMetadata::new().aggregation_action(
			"content",
			Action::Move,
			ActionDescriptor::new("moveControls"),
		)
	};
	let mut design_time = DesignTimeRegistry::builder();
	design_time
		.register("Form", movable())
		.unwrap()
		.register("Group", movable())
		.unwrap()
		.register("Panel", DesignTimeMetadata::new())
		.unwrap()
		.register(
			"Text",
			DesignTimeMetadata::new()
				.action(Action::Rename, ActionDescriptor::new("rename"))
				.action(Action::Remove, ActionDescriptor::new("hideControl")),
		)
		.unwrap()
		.register("VariantManagement", DesignTimeMetadata::new().variant_management())
		.unwrap();

	let mut session = AuthoringSession::new(
		AuthoringConfig::default(),
		Arc::new(changes.build()),
		Arc::new(design_time.build()),
		tree(),
		variants(),
	);
	session.register_element(&id("form"));
	session.take_events();
	session
}

pub fn overlay(s: &Session, element: &str) -> OverlayId {
	s.overlay_of(&id(element)).unwrap()
}

pub fn content(s: &Session, element: &str) -> Vec<ElementId> {
	s.tree()
		.aggregation(&id(element), &"content".into())
		.unwrap()
}

pub fn text(s: &Session, element: &str) -> PropertyValue {
	s.tree().property(&id(element), "text").unwrap()
}

pub fn scope(s: &Session, element: &str) -> Option<VariantScopeId> {
	s.overlays()
		.get(overlay(s, element))
		.unwrap()
		.variant_management()
		.cloned()
}
