//! Overlay arena.
//!
//! Every registered host element gets one [`Overlay`] carrying its authoring
//! state: plugin votes, cached stable-id verdict, variant-management scope,
//! selection. Overlays form a tree mirroring the element tree, stored as
//! indices into a [`Slab`] so parent, child and relevant-container links are
//! plain [`OverlayId`]s rather than owning references.

use std::cell::OnceCell;
use std::fmt;

use rta_primitives::{ElementId, ElementTree, VariantScopeId};
use rustc_hash::FxHashMap;
use slab::Slab;
use tracing::trace;

mod variant;
mod votes;

pub use votes::{Relation, Vote, VoteSet};

/// Handle of an overlay in its [`OverlayArena`].
///
/// Slots are reused after removal. The generation tells a reused slot apart,
/// so a handle to a removed overlay never resolves to its successor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId {
	index: usize,
	generation: u32,
}

impl fmt::Debug for OverlayId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "OverlayId({}v{})", self.index, self.generation)
	}
}

/// Authoring shadow of one host element.
#[derive(Debug)]
pub struct Overlay {
	element: ElementId,
	parent: Option<OverlayId>,
	children: Vec<OverlayId>,
	relevant_container: Option<OverlayId>,
	relevant_overlays: Vec<OverlayId>,
	stable_id: OnceCell<bool>,
	votes: VoteSet,
	variant_management: Option<VariantScopeId>,
	managed_scope: Option<VariantScopeId>,
	scope_root: Option<VariantScopeId>,
	selected: bool,
	error_state: bool,
	generation: u32,
}

impl Overlay {
	fn new(element: ElementId, parent: Option<OverlayId>, generation: u32) -> Self {
		Self {
			generation,
			element,
			parent,
			children: Vec::new(),
			relevant_container: parent,
			relevant_overlays: Vec::new(),
			stable_id: OnceCell::new(),
			votes: VoteSet::default(),
			variant_management: None,
			managed_scope: None,
			scope_root: None,
			selected: false,
			error_state: false,
		}
	}

	fn id(&self, index: usize) -> OverlayId {
		OverlayId {
			index,
			generation: self.generation,
		}
	}

	pub fn element(&self) -> &ElementId {
		&self.element
	}

	pub fn parent(&self) -> Option<OverlayId> {
		self.parent
	}

	pub fn children(&self) -> &[OverlayId] {
		&self.children
	}

	/// Ancestor against which changes of this overlay may be recorded.
	pub fn relevant_container(&self) -> Option<OverlayId> {
		self.relevant_container
	}

	/// Cached set of overlays re-evaluated when this one changes. Empty until
	/// first computed.
	pub fn relevant_overlays(&self) -> &[OverlayId] {
		&self.relevant_overlays
	}

	/// Cached stable-id verdict, computed once on first request.
	pub fn stable_id_cache(&self) -> &OnceCell<bool> {
		&self.stable_id
	}

	pub fn votes(&self) -> &VoteSet {
		&self.votes
	}

	/// An overlay is editable while at least one plugin votes for it.
	pub fn is_editable(&self) -> bool {
		!self.votes.is_empty()
	}

	pub fn variant_management(&self) -> Option<&VariantScopeId> {
		self.variant_management.as_ref()
	}

	pub fn set_variant_management(&mut self, scope: Option<VariantScopeId>) {
		self.variant_management = scope;
	}

	/// Scope managed by this overlay's own variant-management control.
	///
	/// Independent of [`variant_management`](Self::variant_management), which
	/// names the scope the overlay belongs to.
	pub fn managed_scope(&self) -> Option<&VariantScopeId> {
		self.managed_scope.as_ref()
	}

	pub fn set_managed_scope(&mut self, scope: Option<VariantScopeId>) {
		self.managed_scope = scope;
	}

	/// Scope this overlay is the propagation root of, if any.
	pub fn scope_root(&self) -> Option<&VariantScopeId> {
		self.scope_root.as_ref()
	}

	pub fn is_selected(&self) -> bool {
		self.selected
	}

	pub fn has_error_state(&self) -> bool {
		self.error_state
	}

	pub fn set_error_state(&mut self, error: bool) {
		self.error_state = error;
	}
}

/// Arena of overlays, indexed by [`OverlayId`] and by element id.
#[derive(Debug, Default)]
pub struct OverlayArena {
	slots: Slab<Overlay>,
	by_element: FxHashMap<ElementId, OverlayId>,
	focused: Option<OverlayId>,
	generation: u32,
}

impl OverlayArena {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
		self.slots
			.get(id.index)
			.filter(|o| o.generation == id.generation)
	}

	pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
		self.slots
			.get_mut(id.index)
			.filter(|o| o.generation == id.generation)
	}

	pub fn contains(&self, id: OverlayId) -> bool {
		self.get(id).is_some()
	}

	pub fn by_element(&self, element: &ElementId) -> Option<OverlayId> {
		self.by_element.get(element).copied()
	}

	pub fn element(&self, id: OverlayId) -> Option<&ElementId> {
		self.get(id).map(Overlay::element)
	}

	pub fn iter(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
		self.slots.iter().map(|(k, o)| (o.id(k), o))
	}

	/// Registers overlays for `element` and every descendant that has none yet.
	///
	/// Returns the newly created overlays in pre-order, so parents always
	/// precede their children.
	pub fn register(&mut self, tree: &dyn ElementTree, element: &ElementId) -> Vec<OverlayId> {
		let mut created = Vec::new();
		if !tree.contains(element) {
			return created;
		}
		let parent = tree
			.position(element)
			.and_then(|p| self.by_element(&p.parent));
		self.register_subtree(tree, element, parent, &mut created);
		if let Some(parent) = parent {
			self.sync_children(tree, parent);
		}
		created
	}

	fn register_subtree(
		&mut self,
		tree: &dyn ElementTree,
		element: &ElementId,
		parent: Option<OverlayId>,
		created: &mut Vec<OverlayId>,
	) {
		let id = match self.by_element(element) {
			Some(existing) => existing,
			None => {
				self.generation = self.generation.wrapping_add(1);
				let generation = self.generation;
				let index = self
					.slots
					.insert(Overlay::new(element.clone(), parent, generation));
				let id = OverlayId { index, generation };
				self.by_element.insert(element.clone(), id);
				trace!(%element, ?id, "overlay registered");
				created.push(id);
				id
			}
		};
		let children = tree.children(element);
		for child in &children {
			self.register_subtree(tree, child, Some(id), created);
		}
		self.sync_children(tree, id);
	}

	/// Removes the overlay of `element` and its whole subtree.
	///
	/// Returns the removed overlays, children before parents.
	pub fn remove(&mut self, element: &ElementId) -> Vec<(OverlayId, Overlay)> {
		let Some(root) = self.by_element(element) else {
			return Vec::new();
		};
		self.unlink(root);
		let mut doomed = self.descendants(root);
		doomed.reverse();
		doomed.push(root);
		self.invalidate_relevant_around(&doomed);

		let mut removed = Vec::with_capacity(doomed.len());
		for id in doomed {
			let overlay = self.slots.remove(id.index);
			self.by_element.remove(&overlay.element);
			if self.focused == Some(id) {
				self.focused = None;
			}
			trace!(element = %overlay.element, ?id, "overlay removed");
			removed.push((id, overlay));
		}
		removed
	}

	/// Re-links the overlay of `element` under the overlay of its current
	/// tree parent. Detached elements become overlay roots.
	pub fn relink(&mut self, tree: &dyn ElementTree, element: &ElementId) -> Option<OverlayId> {
		let id = self.by_element(element)?;
		let old_parent = self.get(id)?.parent;
		let new_parent = tree
			.position(element)
			.and_then(|p| self.by_element(&p.parent));

		self.unlink(id);
		if let Some(overlay) = self.get_mut(id) {
			overlay.parent = new_parent;
			overlay.relevant_container = new_parent;
		}
		if let Some(parent) = new_parent {
			self.sync_children(tree, parent);
		}
		let mut touched = vec![id];
		touched.extend(old_parent);
		touched.extend(new_parent);
		self.invalidate_relevant_around(&touched);
		trace!(%element, ?old_parent, ?new_parent, "overlay relinked");
		Some(id)
	}

	fn unlink(&mut self, id: OverlayId) {
		let Some(parent) = self.get(id).and_then(|o| o.parent) else {
			return;
		};
		if let Some(p) = self.get_mut(parent) {
			p.children.retain(|c| *c != id);
		}
		if let Some(o) = self.get_mut(id) {
			o.parent = None;
		}
	}

	/// Rebuilds the child list of `id` in tree order from registered overlays.
	fn sync_children(&mut self, tree: &dyn ElementTree, id: OverlayId) {
		let Some(element) = self.element(id).cloned() else {
			return;
		};
		let children: Vec<OverlayId> = tree
			.children(&element)
			.iter()
			.filter_map(|c| self.by_element(c))
			.filter(|c| self.get(*c).is_some_and(|o| o.parent == Some(id)))
			.collect();
		if let Some(overlay) = self.get_mut(id) {
			overlay.children = children;
		}
	}

	/// Overrides the relevant container of an overlay.
	pub fn set_relevant_container(&mut self, id: OverlayId, container: Option<OverlayId>) {
		if let Some(overlay) = self.get_mut(id) {
			overlay.relevant_container = container;
		}
		self.invalidate_relevant_around(&[id]);
	}

	/// Iterates the ancestors of `id`, nearest first.
	pub fn ancestors(&self, id: OverlayId) -> impl Iterator<Item = OverlayId> + '_ {
		std::iter::successors(self.get(id).and_then(|o| o.parent), |p| {
			self.get(*p).and_then(|o| o.parent)
		})
	}

	/// Returns all descendants of `id` in pre-order, excluding `id`.
	pub fn descendants(&self, id: OverlayId) -> Vec<OverlayId> {
		let mut out = Vec::new();
		let mut stack: Vec<OverlayId> = self
			.get(id)
			.map(|o| o.children.iter().rev().copied().collect())
			.unwrap_or_default();
		while let Some(next) = stack.pop() {
			out.push(next);
			if let Some(o) = self.get(next) {
				stack.extend(o.children.iter().rev().copied());
			}
		}
		out
	}

	/// Overlays whose editability may change together with `id`: the overlay
	/// itself, its relevant container, and every overlay below that container
	/// sharing it as relevant container.
	pub fn find_all_in_container(&self, id: OverlayId) -> Vec<OverlayId> {
		let mut out = vec![id];
		let Some(container) = self.get(id).and_then(|o| o.relevant_container) else {
			return out;
		};
		out.push(container);
		for d in self.descendants(container) {
			if d != id && self.get(d).is_some_and(|o| o.relevant_container == Some(container)) {
				out.push(d);
			}
		}
		out
	}

	/// Returns the cached relevant overlays of `id`, computing them when the
	/// cache is empty.
	pub fn relevant_overlays(&mut self, id: OverlayId) -> Vec<OverlayId> {
		let cached = match self.get(id) {
			Some(o) => o.relevant_overlays.clone(),
			None => return Vec::new(),
		};
		if !cached.is_empty() {
			return cached;
		}
		let computed = self.find_all_in_container(id);
		if let Some(o) = self.get_mut(id) {
			o.relevant_overlays = computed.clone();
		}
		computed
	}

	/// Drops every relevant-overlay cache that mentions one of `ids`, plus the
	/// caches of `ids` themselves.
	pub fn invalidate_relevant_around(&mut self, ids: &[OverlayId]) {
		for (key, overlay) in self.slots.iter_mut() {
			if ids.contains(&overlay.id(key))
				|| overlay.relevant_overlays.iter().any(|r| ids.contains(r))
			{
				overlay.relevant_overlays.clear();
			}
		}
	}

	/// Adds a vote. Returns `true` if it was not present.
	pub fn add_vote(&mut self, id: OverlayId, vote: Vote) -> bool {
		self.get_mut(id).is_some_and(|o| o.votes.insert(vote))
	}

	/// Removes a vote. Returns `true` if it was present.
	pub fn remove_vote(&mut self, id: OverlayId, vote: Vote) -> bool {
		self.get_mut(id).is_some_and(|o| o.votes.remove(vote))
	}

	pub fn selected(&self) -> Vec<OverlayId> {
		self.iter()
			.filter(|(_, o)| o.selected)
			.map(|(id, _)| id)
			.collect()
	}

	pub fn set_selected(&mut self, id: OverlayId, selected: bool) {
		if let Some(o) = self.get_mut(id) {
			o.selected = selected;
		}
	}

	pub fn clear_selection(&mut self) {
		for (_, o) in self.slots.iter_mut() {
			o.selected = false;
		}
	}

	pub fn focus(&mut self, id: OverlayId) {
		if self.contains(id) {
			self.focused = Some(id);
		}
	}

	pub fn focused(&self) -> Option<OverlayId> {
		self.focused
	}
}
