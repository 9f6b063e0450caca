//! Variant-management scope propagation over the overlay tree.

use rta_primitives::VariantScopeId;
use tracing::debug;

use super::{OverlayArena, OverlayId};

impl OverlayArena {
	/// Assigns `scope` to `root` and every overlay below it, marking `root` as
	/// the scope's propagation root.
	///
	/// Subtrees rooted at an overlay that is the root of a different scope,
	/// or that manages a different scope itself, are skipped. Returns the overlays that received the scope, `root` first.
	pub fn propagate_variant_management(
		&mut self,
		root: OverlayId,
		scope: &VariantScopeId,
	) -> Vec<OverlayId> {
		let Some(overlay) = self.get_mut(root) else {
			return Vec::new();
		};
		overlay.scope_root = Some(scope.clone());
		overlay.variant_management = Some(scope.clone());

		let mut assigned = vec![root];
		let mut stack: Vec<OverlayId> = overlay.children.iter().rev().copied().collect();
		while let Some(next) = stack.pop() {
			let Some(o) = self.get_mut(next) else {
				continue;
			};
			if o.scope_root.as_ref().is_some_and(|s| s != scope)
				|| o.managed_scope.as_ref().is_some_and(|s| s != scope)
			{
				continue;
			}
			o.variant_management = Some(scope.clone());
			assigned.push(next);
			stack.extend(o.children.iter().rev().copied());
		}
		debug!(%scope, ?root, count = assigned.len(), "variant management propagated");
		assigned
	}

	/// Walks the ancestors of `id` and returns the first scope found.
	pub fn variant_management_from_parent(&self, id: OverlayId) -> Option<VariantScopeId> {
		self.ancestors(id)
			.find_map(|a| self.get(a).and_then(|o| o.variant_management.clone()))
	}

	/// Gives `id` and its unscoped descendants the scope of their nearest
	/// scoped ancestor.
	pub fn inherit_variant_management(&mut self, id: OverlayId) -> Option<VariantScopeId> {
		if let Some(existing) = self.get(id).and_then(|o| o.variant_management.clone()) {
			return Some(existing);
		}
		let scope = self.variant_management_from_parent(id)?;
		for target in std::iter::once(id).chain(self.descendants(id)) {
			if let Some(o) = self.get_mut(target)
				&& o.variant_management.is_none()
			{
				o.variant_management = Some(scope.clone());
			}
		}
		Some(scope)
	}

	/// Recomputes the scope of `id` and its subtree after `id` moved.
	///
	/// Propagation roots and overlays managing their own scope keep theirs,
	/// and so do the subtrees below them.
	pub fn refresh_variant_management(&mut self, id: OverlayId) -> Option<VariantScopeId> {
		if self.declares_scope(id) {
			return self.get(id).and_then(|o| o.variant_management.clone());
		}
		let scope = self.variant_management_from_parent(id);
		let mut stack = vec![id];
		while let Some(next) = stack.pop() {
			if next != id && self.declares_scope(next) {
				continue;
			}
			let Some(o) = self.get_mut(next) else {
				continue;
			};
			o.variant_management = scope.clone();
			stack.extend(o.children.iter().rev().copied());
		}
		scope
	}

	fn declares_scope(&self, id: OverlayId) -> bool {
		self.get(id)
			.is_some_and(|o| o.scope_root.is_some() || o.managed_scope.is_some())
	}
}
