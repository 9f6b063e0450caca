//! Shared test fixture: a small form with a variant-managed section.
//!
//! ```text
//! page (Page).content
//! ├── vm (VariantManagement)          for → [section]
//! ├── section (Section).content
//! │   ├── label (Label)   text = "Name"
//! │   ├── field (Input)
//! │   └── __label1 (Label)
//! ├── target (Section).content        (empty)
//! └── box (Box).items
//!     └── boxed (Label)
//! ```

use std::sync::Arc;

use rta_primitives::{
	ElementId, ElementTree, MemoryTree, MemoryVariantModel, PropertyValue, VariantEntry,
};
use rta_registry::{
	Action, ActionDescriptor, CapabilityDescriptor, ChangeRegistry, DesignTimeMetadata,
	DesignTimeRegistry, LayerSet,
};

use crate::config::AuthoringConfig;
use crate::session::AuthoringSession;

pub(crate) type Session = AuthoringSession<MemoryTree, MemoryVariantModel>;

pub(crate) fn id(s: &str) -> ElementId {
	ElementId::new(s)
}

pub(crate) fn tree() -> MemoryTree {
	let mut tree = MemoryTree::new();
	let page = tree.add_root("page", "Page").unwrap();
	let vm = tree.add_child(&page, "content", "vm", "VariantManagement").unwrap();
	let section = tree.add_child(&page, "content", "section", "Section").unwrap();
	let label = tree.add_child(&section, "content", "label", "Label").unwrap();
	tree.add_child(&section, "content", "field", "Input").unwrap();
	tree.add_child(&section, "content", "__label1", "Label").unwrap();
	let target = tree.add_child(&page, "content", "target", "Section").unwrap();
	tree.declare_aggregation(&target, "content").unwrap();
	let boxed = tree.add_child(&page, "content", "box", "Box").unwrap();
	tree.add_child(&boxed, "items", "boxed", "Label").unwrap();
	tree.set_association(&vm, "for", vec![section]).unwrap();
	tree.set_property(&label, "text", PropertyValue::from("Name"))
		.unwrap();
	tree
}

pub(crate) fn variants() -> MemoryVariantModel {
	let mut variants = MemoryVariantModel::new();
	variants
		.add_scope(
			"vm",
			vec![
				VariantEntry::new("standard", "Standard"),
				VariantEntry::new("compact", "Compact"),
				VariantEntry::new("legacy", "Legacy").hidden(),
			],
		)
		.unwrap();
	variants
}

pub(crate) fn change_registry() -> ChangeRegistry {
	let revertible = CapabilityDescriptor::revertible();
	let mut builder = ChangeRegistry::builder();
	for (control, change) in [
		("Page", "moveControls"),
		("Page", "addGroup"),
		("Section", "moveControls"),
		("Section", "addGroup"),
		("Section", "rename"),
		("Section", "hideControl"),
		("Label", "rename"),
		("Label", "hideControl"),
		("Input", "hideControl"),
	] {
		builder
			.register(control, change, LayerSet::ADAPTATION, revertible)
			.unwrap();
	}
	builder.build()
}

pub(crate) fn design_time() -> DesignTimeRegistry {
	let container = || {
		DesignTimeMetadata::new()
			.aggregation_action("content", Action::Move, ActionDescriptor::new("moveControls"))
			.aggregation_action(
				"content",
				Action::CreateContainer,
				ActionDescriptor::new("addGroup"),
			)
	};
	let mut builder = DesignTimeRegistry::builder();
	builder
		.register("Page", container())
		.unwrap()
		.register(
			"Section",
			container()
				.action(
					Action::Rename,
					ActionDescriptor::new("rename").with_property("title"),
				)
				.action(Action::Remove, ActionDescriptor::new("hideControl")),
		)
		.unwrap()
		.register(
			"Label",
			DesignTimeMetadata::new()
				.action(Action::Rename, ActionDescriptor::new("rename"))
				.action(Action::Remove, ActionDescriptor::new("hideControl")),
		)
		.unwrap()
		.register(
			"Input",
			DesignTimeMetadata::new().action(Action::Remove, ActionDescriptor::new("hideControl")),
		)
		.unwrap()
		.register("VariantManagement", DesignTimeMetadata::new().variant_management())
		.unwrap()
		.register("Box", DesignTimeMetadata::new())
		.unwrap();
	builder.build()
}

pub(crate) fn session_with(config: AuthoringConfig) -> Session {
	let mut session = AuthoringSession::new(
		config,
		Arc::new(change_registry()),
		Arc::new(design_time()),
		tree(),
		variants(),
	);
	session.register_element(&id("page"));
	session.take_events();
	session
}

pub(crate) fn session() -> Session {
	session_with(AuthoringConfig::default())
}
