//! Variant data provider seam and an in-memory model.

use rustc_hash::FxHashMap;

use crate::error::VariantError;
use crate::ids::{VariantKey, VariantScopeId};

/// One named configuration variant inside a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEntry {
	pub key: VariantKey,
	pub title: String,
	pub visible: bool,
}

impl VariantEntry {
	pub fn new(key: impl Into<VariantKey>, title: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			title: title.into(),
			visible: true,
		}
	}

	pub fn hidden(mut self) -> Self {
		self.visible = false;
		self
	}
}

/// Current and available variants per variant-management scope.
///
/// Mutating methods return the value they replaced so commands can undo them.
pub trait VariantModel {
	fn variants(&self, scope: &VariantScopeId) -> Result<Vec<VariantEntry>, VariantError>;

	fn current(&self, scope: &VariantScopeId) -> Result<VariantKey, VariantError>;

	/// Makes `key` current, returning the previously current key.
	fn switch(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
	) -> Result<VariantKey, VariantError>;

	/// Appends a new variant.
	fn insert(&mut self, scope: &VariantScopeId, entry: VariantEntry) -> Result<(), VariantError>;

	/// Removes a variant that is not current.
	fn remove(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
	) -> Result<VariantEntry, VariantError>;

	/// Sets a title, returning the previous one.
	fn set_title(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
		title: &str,
	) -> Result<String, VariantError>;

	/// Sets visibility, returning the previous flag.
	fn set_visible(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
		visible: bool,
	) -> Result<bool, VariantError>;

	fn entry(&self, scope: &VariantScopeId, key: &VariantKey) -> Result<VariantEntry, VariantError> {
		self.variants(scope)?
			.into_iter()
			.find(|e| &e.key == key)
			.ok_or_else(|| VariantError::UnknownVariant {
				scope: scope.clone(),
				key: key.clone(),
			})
	}
}

#[derive(Debug, Clone)]
struct Scope {
	entries: Vec<VariantEntry>,
	current: VariantKey,
}

/// [`VariantModel`] held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryVariantModel {
	scopes: FxHashMap<VariantScopeId, Scope>,
}

impl MemoryVariantModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a scope with its variants. The first entry becomes current.
	pub fn add_scope(
		&mut self,
		scope: impl Into<VariantScopeId>,
		entries: Vec<VariantEntry>,
	) -> Result<(), VariantError> {
		let scope = scope.into();
		let current = entries
			.first()
			.map(|e| e.key.clone())
			.ok_or_else(|| VariantError::EmptyScope(scope.clone()))?;
		self.scopes.insert(scope, Scope { entries, current });
		Ok(())
	}

	fn scope(&self, scope: &VariantScopeId) -> Result<&Scope, VariantError> {
		self.scopes
			.get(scope)
			.ok_or_else(|| VariantError::UnknownScope(scope.clone()))
	}

	fn entry_mut(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
	) -> Result<&mut VariantEntry, VariantError> {
		self.scopes
			.get_mut(scope)
			.ok_or_else(|| VariantError::UnknownScope(scope.clone()))?
			.entries
			.iter_mut()
			.find(|e| &e.key == key)
			.ok_or_else(|| VariantError::UnknownVariant {
				scope: scope.clone(),
				key: key.clone(),
			})
	}
}

impl VariantModel for MemoryVariantModel {
	fn variants(&self, scope: &VariantScopeId) -> Result<Vec<VariantEntry>, VariantError> {
		Ok(self.scope(scope)?.entries.clone())
	}

	fn current(&self, scope: &VariantScopeId) -> Result<VariantKey, VariantError> {
		Ok(self.scope(scope)?.current.clone())
	}

	fn switch(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
	) -> Result<VariantKey, VariantError> {
		self.entry_mut(scope, key)?;
		let state = self
			.scopes
			.get_mut(scope)
			.ok_or_else(|| VariantError::UnknownScope(scope.clone()))?;
		Ok(std::mem::replace(&mut state.current, key.clone()))
	}

	fn insert(&mut self, scope: &VariantScopeId, entry: VariantEntry) -> Result<(), VariantError> {
		let state = self
			.scopes
			.get_mut(scope)
			.ok_or_else(|| VariantError::UnknownScope(scope.clone()))?;
		if state.entries.iter().any(|e| e.key == entry.key) {
			return Err(VariantError::DuplicateKey {
				scope: scope.clone(),
				key: entry.key,
			});
		}
		state.entries.push(entry);
		Ok(())
	}

	fn remove(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
	) -> Result<VariantEntry, VariantError> {
		let state = self
			.scopes
			.get_mut(scope)
			.ok_or_else(|| VariantError::UnknownScope(scope.clone()))?;
		if &state.current == key {
			return Err(VariantError::RemoveCurrent {
				scope: scope.clone(),
				key: key.clone(),
			});
		}
		let index = state
			.entries
			.iter()
			.position(|e| &e.key == key)
			.ok_or_else(|| VariantError::UnknownVariant {
				scope: scope.clone(),
				key: key.clone(),
			})?;
		Ok(state.entries.remove(index))
	}

	fn set_title(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
		title: &str,
	) -> Result<String, VariantError> {
		let entry = self.entry_mut(scope, key)?;
		Ok(std::mem::replace(&mut entry.title, title.to_owned()))
	}

	fn set_visible(
		&mut self,
		scope: &VariantScopeId,
		key: &VariantKey,
		visible: bool,
	) -> Result<bool, VariantError> {
		let entry = self.entry_mut(scope, key)?;
		Ok(std::mem::replace(&mut entry.visible, visible))
	}
}

#[cfg(test)]
mod tests;
