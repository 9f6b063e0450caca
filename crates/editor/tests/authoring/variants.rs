use pretty_assertions::assert_eq;
use rta_editor::rename::AcceptAll;
use rta_editor::{AuthoringEvent, DuplicateTitleError, ElementMutation, RenameError};
use rta_primitives::{VariantModel, VariantScopeId};

use crate::common::{id, overlay, scope, session, Session};

fn title(s: &Session, key: &str) -> String {
	s.variants()
		.entry(&VariantScopeId::new("vm"), &key.into())
		.unwrap()
		.title
}

#[test]
fn visible_duplicate_title_is_rejected() {
	let mut s = session();
	let vm = overlay(&s, "vm");
	let ticket = s.start_variant_rename(vm).unwrap();
	assert_eq!(
		s.finish_variant_rename(ticket, Ok("Wide".to_owned())),
		Err(RenameError::DuplicateTitle(DuplicateTitleError {
			title: "Wide".to_owned()
		}))
	);
	assert!(s.overlays().get(vm).unwrap().has_error_state());
	assert!(s.take_events().iter().all(|e| e.command().is_none()));
	assert_eq!(title(&s, "default"), "Default");
}

#[test]
fn hidden_sibling_title_can_be_reused() {
	let mut s = session();
	let vm = overlay(&s, "vm");
	let ticket = s.start_variant_rename(vm).unwrap();
	assert_eq!(s.finish_variant_rename(ticket, Ok("Archived".to_owned())), Ok(true));
	assert!(!s.overlays().get(vm).unwrap().has_error_state());

	let events = s.take_events();
	let command = events.iter().find_map(AuthoringEvent::command).unwrap();
	assert_eq!(command.name(), "setTitle");
	assert_eq!(
		command.meta().variant_reference,
		Some(VariantScopeId::new("vm"))
	);
}

#[tokio::test]
async fn confirmed_rename_is_undoable() {
	let mut s = session();
	let vm = overlay(&s, "vm");
	assert_eq!(s.rename_variant(vm, &AcceptAll, "  Compact  ".to_owned()).await, Ok(true));
	s.commit_pending().unwrap();
	assert_eq!(title(&s, "default"), "Compact");
	s.undo().unwrap();
	assert_eq!(title(&s, "default"), "Default");
}

#[test]
fn scope_reaches_every_governed_descendant() {
	let mut s = session();
	for element in ["vm", "p", "e1", "e2"] {
		assert_eq!(scope(&s, element), Some(VariantScopeId::new("vm")), "{element}");
	}
	for element in ["form", "q", "locked", "e3"] {
		assert_eq!(scope(&s, element), None, "{element}");
	}

	let tree = s.tree_mut();
	let g = tree.add_child(&id("p"), "content", "g", "Group").unwrap();
	tree.add_child(&g, "content", "deep", "Text").unwrap();
	s.element_modified(
		&id("p"),
		ElementMutation::InsertAggregation {
			aggregation: "content".into(),
			child: g,
		},
	);
	assert_eq!(scope(&s, "g"), Some(VariantScopeId::new("vm")));
	assert_eq!(scope(&s, "deep"), Some(VariantScopeId::new("vm")));
}
