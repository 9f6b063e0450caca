use pretty_assertions::assert_eq;
use rta_primitives::{ElementPosition, ElementTree, PropertyValue};

use crate::common::{content, id, overlay, session, text};

#[test]
fn undo_twice_restores_rename_and_move() {
	let mut s = session();
	let e1 = overlay(&s, "e1");

	s.rename(e1, "Y").unwrap();
	assert_eq!(s.commit_pending(), Ok(1));

	assert!(s.drag_start(e1));
	s.drag_over(ElementPosition::new("q", "content", 0));
	assert_eq!(s.drag_end(), Ok(true));
	assert_eq!(s.commit_pending(), Ok(1));

	assert_eq!(text(&s, "e1"), PropertyValue::from("Y"));
	assert_eq!(content(&s, "q"), [id("e1")]);
	assert_eq!(content(&s, "p"), [id("e2")]);

	assert_eq!(s.undo(), Ok(true));
	assert_eq!(s.undo(), Ok(true));
	assert_eq!(s.undo(), Ok(false));
	assert_eq!(text(&s, "e1"), PropertyValue::from("X"));
	assert_eq!(content(&s, "p"), [id("e1"), id("e2")]);
	assert!(content(&s, "q").is_empty());
	assert!(!s.stack().is_dirty());

	assert_eq!(s.redo(), Ok(true));
	assert_eq!(text(&s, "e1"), PropertyValue::from("Y"));
	assert_eq!(content(&s, "p"), [id("e1"), id("e2")]);
}

#[test]
fn push_after_undo_discards_redo() {
	let mut s = session();
	let e1 = overlay(&s, "e1");
	s.rename(e1, "Y").unwrap();
	s.commit_pending().unwrap();
	s.undo().unwrap();
	assert!(s.stack().can_redo());

	s.rename(overlay(&s, "e2"), "Z").unwrap();
	s.commit_pending().unwrap();
	assert_eq!(s.redo(), Ok(false));
	assert_eq!(text(&s, "e1"), PropertyValue::from("X"));
	assert_eq!(text(&s, "e2"), PropertyValue::from("Z"));
	assert_eq!(s.stack().len(), 1);
}

#[test]
fn redo_reproduces_the_undone_state() {
	let mut s = session();
	let e2 = overlay(&s, "e2");
	s.remove(e2).unwrap();
	s.commit_pending().unwrap();
	let hidden = s.tree().clone();

	s.undo().unwrap();
	s.redo().unwrap();
	assert_eq!(
		s.tree().property(&id("e2"), "visible"),
		hidden.property(&id("e2"), "visible")
	);
}
