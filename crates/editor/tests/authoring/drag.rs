use pretty_assertions::assert_eq;
use rta_editor::{AuthoringEvent, IllegalMoveError};
use rta_primitives::ElementPosition;

use crate::common::{content, id, overlay, scope, session};

#[test]
fn drop_without_move_capability_changes_nothing() {
	let mut s = session();
	let e1 = overlay(&s, "e1");
	assert!(s.drag_start(e1));
	s.drag_over(ElementPosition::new("locked", "content", 0));
	assert_eq!(
		s.drag_end(),
		Err(IllegalMoveError::NoMoveAction {
			container: id("locked"),
			aggregation: "content".into(),
		})
	);

	assert_eq!(content(&s, "p"), [id("e1"), id("e2")]);
	assert_eq!(content(&s, "locked"), [id("e3")]);
	let events = s.take_events();
	assert_eq!(events.len(), 1);
	assert!(matches!(events[0], AuthoringEvent::DragStarted(o) if o == e1));
}

#[test]
fn element_in_locked_container_cannot_be_dragged() {
	let mut s = session();
	assert!(!s.drag_start(overlay(&s, "e3")));
	assert!(s.take_events().is_empty());
}

#[test]
fn legal_drop_emits_exactly_one_command() {
	let mut s = session();
	let e2 = overlay(&s, "e2");
	assert!(s.drag_start(e2));
	s.drag_over(ElementPosition::new("p", "content", 0));
	s.drag_over(ElementPosition::new("q", "content", 0));
	assert_eq!(s.drag_end(), Ok(true));
	assert_eq!(s.drag_end(), Ok(false));

	assert_eq!(s.overlays().selected(), [e2]);
	assert_eq!(s.overlays().focused(), Some(e2));
	let commands = s
		.take_events()
		.iter()
		.filter(|e| e.command().is_some())
		.count();
	assert_eq!(commands, 1);
}

#[test]
fn moved_overlay_leaves_its_variant_scope() {
	let mut s = session();
	let e2 = overlay(&s, "e2");
	assert!(scope(&s, "e2").is_some());
	assert!(s.drag_start(e2));
	s.drag_over(ElementPosition::new("q", "content", 0));
	s.drag_end().unwrap();
	s.commit_pending().unwrap();
	assert_eq!(scope(&s, "e2"), None);

	s.undo().unwrap();
	assert_eq!(scope(&s, "e2").map(|v| v.to_string()).as_deref(), Some("vm"));
}

#[test]
fn aborted_drag_emits_nothing() {
	let mut s = session();
	assert!(s.drag_start(overlay(&s, "e1")));
	s.drag_over(ElementPosition::new("q", "content", 0));
	s.drag_abort();
	assert_eq!(s.drag_end(), Ok(false));
	assert!(
		s.take_events()
			.iter()
			.all(|e| matches!(e, AuthoringEvent::DragStarted(_)))
	);
}
