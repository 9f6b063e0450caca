//! Design-time metadata: which authoring actions a control type offers.

use indexmap::IndexMap;
use rta_primitives::{AggregationName, ChangeKind, ControlType, ElementId, ElementTree};
use rustc_hash::FxHashMap;
use strum::{AsRefStr, Display, EnumString};

use crate::error::RegistryError;

/// Authoring actions a control can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
	Rename,
	Remove,
	Move,
	CreateContainer,
}

/// Enumerates the sub-elements whose ids must all be stable for the element
/// to count as stable. `None` means the element cannot name them.
pub type StableElementsFn = fn(&dyn ElementTree, &ElementId) -> Option<Vec<ElementId>>;

/// How an action is turned into a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
	pub change_type: ChangeKind,
	/// Record the change against the relevant container instead of the element.
	pub change_on_relevant_container: bool,
	/// Property edited by rename-like actions.
	pub property: Option<Box<str>>,
}

impl ActionDescriptor {
	pub fn new(change_type: impl Into<ChangeKind>) -> Self {
		Self {
			change_type: change_type.into(),
			change_on_relevant_container: false,
			property: None,
		}
	}

	pub fn on_relevant_container(mut self) -> Self {
		self.change_on_relevant_container = true;
		self
	}

	pub fn with_property(mut self, property: &str) -> Self {
		self.property = Some(property.into());
		self
	}
}

/// Design-time metadata of one control type.
#[derive(Debug, Clone, Default)]
pub struct DesignTimeMetadata {
	actions: FxHashMap<Action, ActionDescriptor>,
	aggregations: IndexMap<AggregationName, FxHashMap<Action, ActionDescriptor>>,
	stable_elements: Option<StableElementsFn>,
	variant_management: bool,
}

impl DesignTimeMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn action(mut self, action: Action, descriptor: ActionDescriptor) -> Self {
		self.actions.insert(action, descriptor);
		self
	}

	pub fn aggregation_action(
		mut self,
		aggregation: impl Into<AggregationName>,
		action: Action,
		descriptor: ActionDescriptor,
	) -> Self {
		self.aggregations
			.entry(aggregation.into())
			.or_default()
			.insert(action, descriptor);
		self
	}

	pub fn stable_elements(mut self, f: StableElementsFn) -> Self {
		self.stable_elements = Some(f);
		self
	}

	/// Marks the control as a variant-management control.
	pub fn variant_management(mut self) -> Self {
		self.variant_management = true;
		self
	}

	pub fn get_action(&self, action: Action) -> Option<&ActionDescriptor> {
		self.actions.get(&action)
	}

	pub fn get_aggregation_action(
		&self,
		aggregation: &AggregationName,
		action: Action,
	) -> Option<&ActionDescriptor> {
		self.aggregations.get(aggregation)?.get(&action)
	}

	/// Returns the first aggregation, in declaration order, offering `action`.
	pub fn first_aggregation_action(
		&self,
		action: Action,
	) -> Option<(&AggregationName, &ActionDescriptor)> {
		self.aggregations
			.iter()
			.find_map(|(name, actions)| actions.get(&action).map(|d| (name, d)))
	}

	pub fn stable_elements_fn(&self) -> Option<StableElementsFn> {
		self.stable_elements
	}

	pub fn is_variant_management(&self) -> bool {
		self.variant_management
	}
}

/// Collects metadata before freezing it into a [`DesignTimeRegistry`].
#[derive(Debug, Default)]
pub struct DesignTimeRegistryBuilder {
	by_control: FxHashMap<ControlType, DesignTimeMetadata>,
}

impl DesignTimeRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(
		&mut self,
		control_type: impl Into<ControlType>,
		metadata: DesignTimeMetadata,
	) -> Result<&mut Self, RegistryError> {
		let control_type = control_type.into();
		if self.by_control.contains_key(&control_type) {
			return Err(RegistryError::DuplicateMetadata(control_type));
		}
		self.by_control.insert(control_type, metadata);
		Ok(self)
	}

	pub fn build(self) -> DesignTimeRegistry {
		DesignTimeRegistry {
			by_control: self.by_control,
		}
	}
}

/// Immutable design-time metadata per control type.
#[derive(Debug, Clone, Default)]
pub struct DesignTimeRegistry {
	by_control: FxHashMap<ControlType, DesignTimeMetadata>,
}

impl DesignTimeRegistry {
	pub fn builder() -> DesignTimeRegistryBuilder {
		DesignTimeRegistryBuilder::new()
	}

	pub fn get(&self, control_type: &ControlType) -> Option<&DesignTimeMetadata> {
		self.by_control.get(control_type)
	}

	/// Resolves the metadata of an element through its control type.
	pub fn for_element(&self, tree: &dyn ElementTree, id: &ElementId) -> Option<&DesignTimeMetadata> {
		self.get(&tree.control_type(id)?)
	}
}
