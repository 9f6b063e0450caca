use pretty_assertions::assert_eq;
use rta_editor::{AuthoringEvent, ElementMutation, PluginKind};
use rta_primitives::ElementTree;

use crate::common::{id, overlay, session};

#[test]
fn editable_iff_some_plugin_votes() {
	let s = session();
	for (_, o) in s.overlays().iter() {
		assert_eq!(o.is_editable(), !o.votes().is_empty(), "{}", o.element());
	}
	let form = s.overlays().get(overlay(&s, "form")).unwrap();
	assert!(!form.is_editable());
	let e3 = overlay(&s, "e3");
	assert!(s.is_editable_by(e3, PluginKind::Rename, None));
	assert!(!s.is_editable_by(e3, PluginKind::DragDrop, None));
}

#[test]
fn removal_retracts_every_vote() {
	let mut s = session();
	let e1 = overlay(&s, "e1");
	assert!(s.is_editable_by(e1, PluginKind::DragDrop, None));

	s.tree_mut()
		.remove(&id("p"), &"content".into(), &id("e1"))
		.unwrap();
	s.element_modified(
		&id("p"),
		ElementMutation::RemoveAggregation {
			aggregation: "content".into(),
			child: id("e1"),
		},
	);
	assert_eq!(s.overlay_of(&id("e1")), None);
	for plugin in [PluginKind::Rename, PluginKind::Remove, PluginKind::DragDrop] {
		assert!(!s.is_editable_by(e1, plugin, None));
	}
	assert!(matches!(
		s.take_events().as_slice(),
		[AuthoringEvent::OverlayDeregistered(e)] if *e == id("e1")
	));
	assert!(s.is_editable_by(overlay(&s, "e2"), PluginKind::DragDrop, None));
}

#[test]
fn hiding_is_reflected_after_undo() {
	let mut s = session();
	let e2 = overlay(&s, "e2");
	s.remove(e2).unwrap();
	s.commit_pending().unwrap();
	assert_eq!(s.tree().property(&id("e2"), "visible"), Ok(false.into()));
	s.undo().unwrap();
	assert!(s.overlays().get(e2).unwrap().is_editable());
}
