use pretty_assertions::assert_eq;

use super::*;

fn model() -> (MemoryVariantModel, VariantScopeId) {
	let scope = VariantScopeId::new("vm");
	let mut model = MemoryVariantModel::new();
	model
		.add_scope(
			scope.clone(),
			vec![
				VariantEntry::new("standard", "Standard"),
				VariantEntry::new("compact", "Compact"),
				VariantEntry::new("legacy", "Legacy").hidden(),
			],
		)
		.unwrap();
	(model, scope)
}

#[test]
fn first_entry_is_current() {
	let (model, scope) = model();
	assert_eq!(model.current(&scope).unwrap(), VariantKey::new("standard"));
}

#[test]
fn switch_returns_previous() {
	let (mut model, scope) = model();
	let prev = model.switch(&scope, &VariantKey::new("compact")).unwrap();
	assert_eq!(prev, VariantKey::new("standard"));
	assert_eq!(model.current(&scope).unwrap(), VariantKey::new("compact"));
	assert!(model.switch(&scope, &VariantKey::new("missing")).is_err());
	assert_eq!(model.current(&scope).unwrap(), VariantKey::new("compact"));
}

#[test]
fn current_variant_cannot_be_removed() {
	let (mut model, scope) = model();
	assert_eq!(
		model.remove(&scope, &VariantKey::new("standard")),
		Err(VariantError::RemoveCurrent {
			scope: scope.clone(),
			key: VariantKey::new("standard"),
		})
	);
	let removed = model.remove(&scope, &VariantKey::new("legacy")).unwrap();
	assert!(!removed.visible);
	assert_eq!(model.variants(&scope).unwrap().len(), 2);
}

#[test]
fn insert_rejects_duplicate_keys() {
	let (mut model, scope) = model();
	assert!(matches!(
		model.insert(&scope, VariantEntry::new("compact", "Again")),
		Err(VariantError::DuplicateKey { .. })
	));
	model
		.insert(&scope, VariantEntry::new("wide", "Wide"))
		.unwrap();
	assert_eq!(
		model.entry(&scope, &VariantKey::new("wide")).unwrap().title,
		"Wide"
	);
}

#[test]
fn title_and_visibility_setters_return_previous() {
	let (mut model, scope) = model();
	let key = VariantKey::new("compact");
	assert_eq!(model.set_title(&scope, &key, "Dense").unwrap(), "Compact");
	assert!(model.set_visible(&scope, &key, false).unwrap());
	let entry = model.entry(&scope, &key).unwrap();
	assert_eq!(entry.title, "Dense");
	assert!(!entry.visible);
}
